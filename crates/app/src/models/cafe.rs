//! Cafe listing types.

use serde::{Deserialize, Serialize};

use cafe_spot_core::{CafeId, UserId};

/// Image shown for listings without an `imageUrl`.
pub const PLACEHOLDER_IMAGE: &str = "assets/coffee-placeholder.jpg";

/// A cafe listing, as stored in the cafe collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: Address,
    pub location: Location,
    /// CNPJ as supplied (masked or not).
    pub cnpj: String,
    /// Free-text price indicator, e.g. `R$ 28`.
    pub average_ticket: String,
    /// May be empty; see [`Cafe::display_image`].
    #[serde(default)]
    pub image_url: String,
    /// Inactive listings are hidden from clients without being deleted.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Users who liked this listing. No duplicates.
    #[serde(default)]
    pub liked_by: Vec<UserId>,
}

/// Postal address of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub zip: String,
    pub neighborhood: String,
    pub city: String,
    /// Upper-cased state code.
    pub state: String,
}

/// Coordinates, kept exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

/// Flat create-or-update payload for a listing.
///
/// Required text fields are plain `String`s and are checked for blanks by
/// the cafe service; optional ones are `Option`s. Missing fields deserialize
/// as blanks so they surface as validation errors, not parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CafeInput {
    /// `None` (or blank) creates a new listing.
    pub id: Option<CafeId>,
    pub name: String,
    pub description: String,
    pub street: String,
    pub number: String,
    pub zip: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub latitude: String,
    pub longitude: String,
    pub cnpj: String,
    pub average_ticket: String,
    pub image_url: Option<String>,
    /// `None` keeps the stored flag on update, and means `true` on create.
    pub active: Option<bool>,
    /// `None` keeps the stored likes on update, and means none on create.
    pub liked_by: Option<Vec<UserId>>,
}

/// Partial address resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookedUpAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

const fn default_active() -> bool {
    true
}

impl Cafe {
    /// Build the canonical listing for `input`.
    ///
    /// Trims every text field, upper-cases the state, keeps a non-blank id
    /// or mints one, and drops repeated entries from `liked_by`.
    #[must_use]
    pub fn new(input: CafeInput) -> Self {
        let id = input
            .id
            .filter(|id| !id.as_str().trim().is_empty())
            .unwrap_or_else(CafeId::generate);

        let mut liked_by: Vec<UserId> = Vec::new();
        for user in input.liked_by.unwrap_or_default() {
            if !liked_by.contains(&user) {
                liked_by.push(user);
            }
        }

        Self {
            id,
            name: input.name.trim().to_owned(),
            description: input.description.trim().to_owned(),
            address: Address {
                street: input.street.trim().to_owned(),
                number: input.number.trim().to_owned(),
                zip: input.zip.trim().to_owned(),
                neighborhood: input.neighborhood.trim().to_owned(),
                city: input.city.trim().to_owned(),
                state: input.state.trim().to_uppercase(),
            },
            location: Location {
                latitude: input.latitude.trim().to_owned(),
                longitude: input.longitude.trim().to_owned(),
            },
            cnpj: input.cnpj.trim().to_owned(),
            average_ticket: input.average_ticket.trim().to_owned(),
            image_url: input.image_url.map(|url| url.trim().to_owned()).unwrap_or_default(),
            active: input.active.unwrap_or(true),
            liked_by,
        }
    }

    /// Number of likes.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }

    /// Whether `user` liked this listing.
    #[must_use]
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    /// Image to display, falling back to the bundled placeholder.
    #[must_use]
    pub fn display_image(&self) -> &str {
        if self.image_url.is_empty() {
            PLACEHOLDER_IMAGE
        } else {
            &self.image_url
        }
    }
}

impl CafeInput {
    /// The fields that must be non-blank, in form order.
    #[must_use]
    pub fn required_fields(&self) -> [(&'static str, &str); 11] {
        [
            ("name", self.name.as_str()),
            ("street", self.street.as_str()),
            ("number", self.number.as_str()),
            ("zip", self.zip.as_str()),
            ("neighborhood", self.neighborhood.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("latitude", self.latitude.as_str()),
            ("longitude", self.longitude.as_str()),
            ("cnpj", self.cnpj.as_str()),
            ("averageTicket", self.average_ticket.as_str()),
        ]
    }

    /// Fill address fields from a postal code lookup.
    ///
    /// Fields the lookup left blank keep their current value. The number,
    /// coordinates and everything else are untouched.
    pub fn apply_address(&mut self, found: &LookedUpAddress) {
        fn merge(current: &mut String, found: &str) {
            if !found.trim().is_empty() {
                found.trim().clone_into(current);
            }
        }

        merge(&mut self.street, &found.street);
        merge(&mut self.neighborhood, &found.neighborhood);
        merge(&mut self.city, &found.city);
        merge(&mut self.state, &found.state);
        merge(&mut self.zip, &found.zip);
    }
}

impl From<&Cafe> for CafeInput {
    fn from(cafe: &Cafe) -> Self {
        Self {
            id: Some(cafe.id.clone()),
            name: cafe.name.clone(),
            description: cafe.description.clone(),
            street: cafe.address.street.clone(),
            number: cafe.address.number.clone(),
            zip: cafe.address.zip.clone(),
            neighborhood: cafe.address.neighborhood.clone(),
            city: cafe.address.city.clone(),
            state: cafe.address.state.clone(),
            latitude: cafe.location.latitude.clone(),
            longitude: cafe.location.longitude.clone(),
            cnpj: cafe.cnpj.clone(),
            average_ticket: cafe.average_ticket.clone(),
            image_url: Some(cafe.image_url.clone()),
            active: Some(cafe.active),
            liked_by: Some(cafe.liked_by.clone()),
        }
    }
}
