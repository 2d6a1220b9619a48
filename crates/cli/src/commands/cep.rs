//! Postal code commands.

use cafe_spot_app::{AppContext, AppError};

use crate::output::Output;

/// Resolve a postal code and print the address.
pub async fn lookup(ctx: &AppContext, out: &Output, cep: &str) -> Result<(), AppError> {
    let found = ctx.address().lookup(cep).await?;
    out.address(&found);
    Ok(())
}
