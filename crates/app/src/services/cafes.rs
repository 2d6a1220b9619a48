//! Cafe listing service.
//!
//! Every mutation re-reads the whole collection under the cafes lock,
//! changes it and writes it back.

use thiserror::Error;

use cafe_spot_core::validation::is_valid_tax_id;
use cafe_spot_core::{CafeId, UserId};

use crate::db::{KeyValueStore, RepositoryError, Store};
use crate::error::{ErrorKind, ValidationError};
use crate::models::{Cafe, CafeInput, CurrentUser};

/// Errors that can occur in listing operations.
#[derive(Debug, Error)]
pub enum CafeError {
    /// The payload is incomplete or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No listing has this id.
    #[error("cafe not found: {0}")]
    NotFound(CafeId),

    /// Reading or writing the store failed.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CafeError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Storage,
        }
    }
}

/// Listing service.
pub struct CafeService<'a, B> {
    store: &'a Store<B>,
}

impl<'a, B: KeyValueStore> CafeService<'a, B> {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(store: &'a Store<B>) -> Self {
        Self { store }
    }

    /// All listings, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Cafe>, CafeError> {
        Ok(self.store.read_cafes().await?)
    }

    /// Listings `viewer` is allowed to see.
    ///
    /// Admins see everything; clients and anonymous viewers see active
    /// listings only.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn list_visible(&self, viewer: Option<&CurrentUser>) -> Result<Vec<Cafe>, CafeError> {
        let mut cafes = self.list().await?;
        if !viewer.is_some_and(CurrentUser::is_admin) {
            cafes.retain(|cafe| cafe.active);
        }
        Ok(cafes)
    }

    /// Find a listing by id.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn get(&self, id: &CafeId) -> Result<Option<Cafe>, CafeError> {
        Ok(self.list().await?.into_iter().find(|cafe| &cafe.id == id))
    }

    /// Create or update a listing.
    ///
    /// A payload whose id matches a stored listing replaces it in place.
    /// `active` and `likedBy` are carried over when the payload leaves them
    /// out. Anything else is appended as a new listing.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::Validation` if a required field is blank or the
    /// CNPJ doesn't have 14 digits; nothing is written in that case.
    /// Returns `CafeError::Repository` if the store fails.
    #[tracing::instrument(skip(self, input), fields(id = ?input.id))]
    pub async fn upsert(&self, mut input: CafeInput) -> Result<Cafe, CafeError> {
        let missing: Vec<&'static str> = input
            .required_fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing).into());
        }
        if !is_valid_tax_id(&input.cnpj) {
            return Err(ValidationError::InvalidTaxId.into());
        }

        let _guard = self.store.lock_cafes().await;
        let mut cafes = self.store.read_cafes().await?;

        let id = input.id.clone();
        let existing = id
            .as_ref()
            .and_then(|id| cafes.iter_mut().find(|cafe| &cafe.id == id));

        let cafe = match existing {
            Some(slot) => {
                if input.active.is_none() {
                    input.active = Some(slot.active);
                }
                if input.liked_by.is_none() {
                    input.liked_by = Some(slot.liked_by.clone());
                }
                *slot = Cafe::new(input);
                tracing::info!(cafe_id = %slot.id, "Updated listing");
                slot.clone()
            }
            None => {
                let cafe = Cafe::new(input);
                tracing::info!(cafe_id = %cafe.id, "Created listing");
                cafes.push(cafe.clone());
                cafe
            }
        };

        self.store.write_cafes(&cafes).await?;
        Ok(cafe)
    }

    /// Delete a listing and return the remaining ones.
    ///
    /// An unknown id is not an error and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn remove(&self, id: &CafeId) -> Result<Vec<Cafe>, CafeError> {
        let _guard = self.store.lock_cafes().await;
        let mut cafes = self.store.read_cafes().await?;

        let before = cafes.len();
        cafes.retain(|cafe| &cafe.id != id);
        if cafes.len() != before {
            self.store.write_cafes(&cafes).await?;
            tracing::info!(cafe_id = %id, "Removed listing");
        }

        Ok(cafes)
    }

    /// Flip a listing's `active` flag.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::NotFound` if no listing has this id.
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn toggle_active(&self, id: &CafeId) -> Result<Cafe, CafeError> {
        self.modify(id, |cafe| {
            cafe.active = !cafe.active;
            tracing::info!(cafe_id = %cafe.id, active = cafe.active, "Toggled listing visibility");
        })
        .await
    }

    /// Like the listing for `user`, or take the like back if already given.
    ///
    /// Taking a like back drops every entry for `user`, so a collection that
    /// picked up duplicates converges to a single state per user.
    ///
    /// # Errors
    ///
    /// Returns `CafeError::NotFound` if no listing has this id.
    /// Returns `CafeError::Repository` if the store fails.
    pub async fn toggle_like(&self, id: &CafeId, user: &UserId) -> Result<Cafe, CafeError> {
        self.modify(id, |cafe| {
            if cafe.is_liked_by(user) {
                cafe.liked_by.retain(|u| u != user);
            } else {
                cafe.liked_by.push(user.clone());
            }
            tracing::debug!(cafe_id = %cafe.id, likes = cafe.like_count(), "Toggled like");
        })
        .await
    }

    /// Apply `change` to one listing and persist the collection.
    async fn modify(&self, id: &CafeId, change: impl FnOnce(&mut Cafe)) -> Result<Cafe, CafeError> {
        let _guard = self.store.lock_cafes().await;
        let mut cafes = self.store.read_cafes().await?;

        let cafe = cafes
            .iter_mut()
            .find(|cafe| &cafe.id == id)
            .ok_or_else(|| CafeError::NotFound(id.clone()))?;
        change(cafe);
        let updated = cafe.clone();

        self.store.write_cafes(&cafes).await?;
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use cafe_spot_core::{Email, UserType};

    use super::*;
    use crate::db::{FlakyStore, MemoryStore, keys};

    fn lua() -> CafeInput {
        CafeInput {
            name: "Lua".to_owned(),
            street: "Rua A".to_owned(),
            number: "1".to_owned(),
            zip: "00000-000".to_owned(),
            neighborhood: "X".to_owned(),
            city: "Y".to_owned(),
            state: "mg".to_owned(),
            latitude: "-1".to_owned(),
            longitude: "-2".to_owned(),
            cnpj: "11.111.111/0001-11".to_owned(),
            average_ticket: "R$10".to_owned(),
            ..CafeInput::default()
        }
    }

    fn viewer(user_type: UserType) -> CurrentUser {
        CurrentUser {
            id: UserId::new("u1"),
            name: "Viewer".to_owned(),
            email: Email::parse("viewer@cafe.com").unwrap(),
            user_type,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_normalized_listing() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);

        let cafe = cafes.upsert(lua()).await.unwrap();

        assert_eq!(cafe.address.state, "MG");
        assert_eq!(cafe.cnpj.chars().filter(char::is_ascii_digit).count(), 14);
        assert!(cafe.active);
        assert!(cafe.liked_by.is_empty());
        assert_eq!(cafes.list().await.unwrap(), vec![cafe]);
    }

    #[tokio::test]
    async fn test_upsert_missing_fields_writes_nothing() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        cafes.upsert(lua()).await.unwrap();
        let before = cafes.list().await.unwrap();

        let mut input = lua();
        input.name = "  ".to_owned();
        input.latitude = String::new();
        let err = cafes.upsert(input).await.unwrap_err();

        assert!(matches!(
            err,
            CafeError::Validation(ValidationError::MissingFields(ref f)) if f == &["name", "latitude"]
        ));
        assert_eq!(cafes.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_upsert_rejects_short_cnpj() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);

        let mut input = lua();
        input.cnpj = "11.111.111/0001".to_owned();
        let err = cafes.upsert(input).await.unwrap_err();

        assert!(matches!(
            err,
            CafeError::Validation(ValidationError::InvalidTaxId)
        ));
        assert!(cafes.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_same_id_updates_in_place() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let first = cafes.upsert(lua()).await.unwrap();
        let mut other = lua();
        other.name = "Other".to_owned();
        cafes.upsert(other).await.unwrap();

        cafes.toggle_like(&first.id, &UserId::new("u1")).await.unwrap();
        cafes.toggle_active(&first.id).await.unwrap();

        let mut edit = lua();
        edit.id = Some(first.id.clone());
        edit.name = "Lua Nova".to_owned();
        let updated = cafes.upsert(edit).await.unwrap();

        let all = cafes.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].name, "Lua Nova");
        assert!(!updated.active);
        assert_eq!(updated.liked_by, vec![UserId::new("u1")]);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_appends_with_that_id() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);

        let mut input = lua();
        input.id = Some(CafeId::new("imported-1"));
        let cafe = cafes.upsert(input).await.unwrap();

        assert_eq!(cafe.id.as_str(), "imported-1");
        assert_eq!(cafes.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_keeps_collection() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let cafe = cafes.upsert(lua()).await.unwrap();

        let remaining = cafes.remove(&CafeId::new("missing")).await.unwrap();
        assert_eq!(remaining, vec![cafe.clone()]);

        let remaining = cafes.remove(&cafe.id).await.unwrap();
        assert!(remaining.is_empty());
        assert!(cafes.get(&cafe.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle_like_is_its_own_inverse() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let cafe = cafes.upsert(lua()).await.unwrap();
        let user = UserId::new("u1");

        let liked = cafes.toggle_like(&cafe.id, &user).await.unwrap();
        assert!(liked.is_liked_by(&user));
        assert_eq!(liked.like_count(), 1);

        let unliked = cafes.toggle_like(&cafe.id, &user).await.unwrap();
        assert_eq!(unliked, cafe);
    }

    #[tokio::test]
    async fn test_unlike_drops_duplicate_entries() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let user = UserId::new("u1");

        let mut cafe = cafes.upsert(lua()).await.unwrap();
        cafe.liked_by = vec![user.clone(), UserId::new("u2"), user.clone()];
        store.write_cafes(std::slice::from_ref(&cafe)).await.unwrap();

        let unliked = cafes.toggle_like(&cafe.id, &user).await.unwrap();
        assert!(!unliked.is_liked_by(&user));
        assert_eq!(unliked.liked_by, vec![UserId::new("u2")]);

        let liked = cafes.toggle_like(&cafe.id, &user).await.unwrap();
        assert_eq!(liked.liked_by.iter().filter(|u| *u == &user).count(), 1);
    }

    #[tokio::test]
    async fn test_toggles_on_unknown_id() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let missing = CafeId::new("missing");

        assert!(matches!(
            cafes.toggle_active(&missing).await,
            Err(CafeError::NotFound(_))
        ));
        assert!(matches!(
            cafes.toggle_like(&missing, &UserId::new("u1")).await,
            Err(CafeError::NotFound(_))
        ));
        assert!(store.backend().get(keys::CAFES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_visible_by_role() {
        let store = Store::new(MemoryStore::new());
        let cafes = CafeService::new(&store);
        let shown = cafes.upsert(lua()).await.unwrap();
        let hidden = cafes.upsert(lua()).await.unwrap();
        cafes.toggle_active(&hidden.id).await.unwrap();

        let anonymous = cafes.list_visible(None).await.unwrap();
        assert_eq!(anonymous, vec![shown.clone()]);

        let client = cafes
            .list_visible(Some(&viewer(UserType::Client)))
            .await
            .unwrap();
        assert_eq!(client, vec![shown]);

        let admin = cafes
            .list_visible(Some(&viewer(UserType::Admin)))
            .await
            .unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn test_write_failures_are_storage_errors() {
        let store = Store::new(FlakyStore::new());
        let cafes = CafeService::new(&store);
        let kept = cafes.upsert(lua()).await.unwrap();
        store.backend().fail_writes_to(keys::CAFES).await;

        let err = cafes.upsert(lua()).await.unwrap_err();
        assert!(matches!(
            err,
            CafeError::Repository(RepositoryError::Backend(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Storage);

        let err = cafes
            .toggle_like(&kept.id, &UserId::new("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(cafes.toggle_active(&kept.id).await.unwrap_err().kind(), ErrorKind::Storage);
        assert_eq!(cafes.remove(&kept.id).await.unwrap_err().kind(), ErrorKind::Storage);

        assert_eq!(cafes.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let store = Arc::new(Store::new(MemoryStore::new()));
        let cafe = CafeService::new(&*store).upsert(lua()).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let id = cafe.id.clone();
            tasks.push(tokio::spawn(async move {
                CafeService::new(&*store)
                    .toggle_like(&id, &UserId::new(format!("user-{i}")))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = CafeService::new(&*store).get(&cafe.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count(), 16);
    }
}
