//! Listing commands.

use clap::Args;

use cafe_spot_app::models::{CafeInput, CurrentUser};
use cafe_spot_app::services::CafeError;
use cafe_spot_app::{AppContext, AppError};
use cafe_spot_core::CafeId;

use super::{require_admin, require_session};
use crate::output::Output;

/// Listing form. On update, omitted fields keep their stored value.
#[derive(Debug, Default, Args)]
pub struct CafeArgs {
    /// Listing to update; omit to create a new one
    #[arg(long)]
    pub id: Option<String>,

    /// Fill street, neighborhood, city, state and zip from this CEP
    #[arg(long)]
    pub cep: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long)]
    pub neighborhood: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// Two-letter state code
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// CNPJ, masked or not
    #[arg(long)]
    pub cnpj: Option<String>,

    /// Price indicator, e.g. "R$ 28"
    #[arg(long)]
    pub average_ticket: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

impl CafeArgs {
    /// Overwrite `input` with every field given on the command line.
    fn apply_to(self, input: &mut CafeInput) {
        let fields = [
            (self.name, &mut input.name),
            (self.description, &mut input.description),
            (self.street, &mut input.street),
            (self.number, &mut input.number),
            (self.zip, &mut input.zip),
            (self.neighborhood, &mut input.neighborhood),
            (self.city, &mut input.city),
            (self.state, &mut input.state),
            (self.latitude, &mut input.latitude),
            (self.longitude, &mut input.longitude),
            (self.cnpj, &mut input.cnpj),
            (self.average_ticket, &mut input.average_ticket),
        ];
        for (given, field) in fields {
            if let Some(value) = given {
                *field = value;
            }
        }
        if self.image_url.is_some() {
            input.image_url = self.image_url;
        }
    }
}

/// List the listings the session may see.
pub async fn list(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
) -> Result<(), AppError> {
    let cafes = ctx.cafes().list_visible(session).await?;
    out.cafes(&cafes, session);
    Ok(())
}

/// Show one listing.
///
/// Inactive listings are only shown to administrators.
pub async fn show(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
    id: &str,
) -> Result<(), AppError> {
    let id = CafeId::new(id);
    let cafe = ctx
        .cafes()
        .get(&id)
        .await?
        .filter(|cafe| cafe.active || session.is_some_and(CurrentUser::is_admin))
        .ok_or(CafeError::NotFound(id))?;
    out.cafe(&cafe, session);
    Ok(())
}

/// Create or update a listing.
pub async fn save(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
    args: CafeArgs,
) -> Result<(), AppError> {
    require_admin(session)?;

    let id = args.id.as_deref().map(CafeId::new);
    let mut input = match &id {
        Some(id) => match ctx.cafes().get(id).await? {
            Some(existing) => CafeInput::from(&existing),
            None => CafeInput {
                id: Some(id.clone()),
                ..CafeInput::default()
            },
        },
        None => CafeInput::default(),
    };

    if let Some(cep) = &args.cep {
        let found = ctx.address().lookup(cep).await?;
        input.apply_address(&found);
    }
    args.apply_to(&mut input);

    let cafe = ctx.cafes().upsert(input).await?;
    out.cafe(&cafe, session);
    Ok(())
}

/// Delete a listing.
pub async fn delete(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
    id: &str,
) -> Result<(), AppError> {
    require_admin(session)?;
    let remaining = ctx.cafes().remove(&CafeId::new(id)).await?;
    out.cafes(&remaining, session);
    Ok(())
}

/// Flip a listing's visibility.
pub async fn toggle_active(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
    id: &str,
) -> Result<(), AppError> {
    require_admin(session)?;
    let cafe = ctx.cafes().toggle_active(&CafeId::new(id)).await?;
    out.cafe(&cafe, session);
    Ok(())
}

/// Like a listing, or take the like back.
pub async fn like(
    ctx: &AppContext,
    out: &Output,
    session: Option<&CurrentUser>,
    id: &str,
) -> Result<(), AppError> {
    let user = require_session(session)?;
    let cafe = ctx.cafes().toggle_like(&CafeId::new(id), &user.id).await?;
    out.cafe(&cafe, session);
    Ok(())
}
