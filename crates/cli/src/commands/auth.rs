//! Session commands.

use dialoguer::Password;
use secrecy::SecretString;

use cafe_spot_app::services::{MIN_PASSWORD_LENGTH, Registration};
use cafe_spot_app::{AppContext, AppError};

use crate::output::Output;

/// Create a client account and log it in.
///
/// Without `password`, asks for it twice on the terminal.
pub async fn register(
    ctx: &AppContext,
    out: &Output,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = match password {
        Some(given) => SecretString::from(given),
        None => prompt_password(true)?,
    };
    let form = Registration {
        name,
        email,
        password,
    };
    let user = ctx.auth().register(&form).await?;
    out.logged_in(&user);
    Ok(())
}

/// Log in with an existing account.
///
/// Without `password`, asks for it on the terminal.
pub async fn login(
    ctx: &AppContext,
    out: &Output,
    email: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = match password {
        Some(given) => SecretString::from(given),
        None => prompt_password(false)?,
    };
    let user = ctx.auth().login(email, &password).await?;
    out.logged_in(&user);
    Ok(())
}

/// End the session.
pub async fn logout(ctx: &AppContext, out: &Output) -> Result<(), AppError> {
    ctx.auth().logout().await?;
    out.session(None);
    Ok(())
}

/// Read a password from the terminal without echoing it.
fn prompt_password(confirm: bool) -> Result<SecretString, AppError> {
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt
            .with_confirmation("Password (again)", "Passwords do not match")
            .validate_with(|input: &String| -> Result<(), String> {
                if input.chars().count() >= MIN_PASSWORD_LENGTH {
                    Ok(())
                } else {
                    Err(format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"))
                }
            });
    }
    prompt
        .interact()
        .map(SecretString::from)
        .map_err(|e| AppError::Prompt(std::io::Error::other(e)))
}
