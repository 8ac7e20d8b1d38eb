use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::entities::v1::{tokens, users};
use crate::error::{HttpError, REQUIRED, Validation};
use crate::metrics::AppMetrics;
use crate::requests::v1::auth::TokenRequest;
use crate::responses::v1::auth::Token;
use crate::security::PasswordHasher;

pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

fn invalid_credentials() -> HttpError {
    let mut validation = Validation::new();
    validation.add("credentials", INVALID_CREDENTIALS);

    validation.into()
}

/// Exchange email and password for the user's token
///
/// Unknown email, inactive account and wrong password are reported with the
/// same error so the response does not reveal which accounts exist.
#[::tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn token(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    metrics: &AppMetrics,
    request: TokenRequest,
) -> Result<Token, HttpError> {
    let mut validation = Validation::new();
    let email = request.email.trim().to_lowercase();
    let password = request.password;

    if email.is_empty() {
        validation.add("email", REQUIRED);
    }

    if password.is_empty() {
        validation.add("password", REQUIRED);
    }

    if !validation.is_empty() {
        metrics.record_token_failure("missing_fields");

        return Err(validation.into());
    }

    let user = match users::Model::find_by_email(db, &email).await? {
        Some(user) if user.is_active => user,
        Some(_) => {
            ::tracing::debug!("Inactive user requested a token");
            metrics.record_token_failure("inactive_user");

            return Err(invalid_credentials());
        }
        None => {
            metrics.record_token_failure("invalid_credentials");

            return Err(invalid_credentials());
        }
    };

    if !hasher
        .verify(&password, &user.password)
        .map_err(HttpError::internal)?
    {
        ::tracing::debug!(user_id = %user.id, "Password mismatch");
        metrics.record_token_failure("invalid_credentials");

        return Err(invalid_credentials());
    }

    rehash(db, hasher, &user, &password).await;

    let token = tokens::Model::get_or_create(db, user.id, config.token_lifetime()).await?;

    metrics.record_token_issued();
    ::tracing::info!(user_id = %user.id, "Token issued");

    Ok(Token { token: token.key })
}

/// Re-hash a verified password when the stored hash uses outdated parameters
///
/// Failures are logged and never block the login.
async fn rehash(db: &DatabaseConnection, hasher: &PasswordHasher, user: &users::Model, password: &str) {
    match hasher.needs_rehash(&user.password) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            ::tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            return;
        }
    }

    let hash = match hasher.hash(password) {
        Ok(hash) => hash,
        Err(e) => {
            ::tracing::warn!(user_id = %user.id, error = %e, "Failed to re-hash password");
            return;
        }
    };

    match user.update_password(db, hash).await {
        Ok(_) => ::tracing::info!(user_id = %user.id, "Password re-hashed with current parameters"),
        Err(e) => ::tracing::warn!(user_id = %user.id, error = %e, "Failed to store re-hashed password"),
    }
}
