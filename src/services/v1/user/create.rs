use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::entities::v1::users::Model;
use crate::error::{HttpError, REQUIRED, Validation};
use crate::helpers::is_unique_violation;
use crate::metrics::AppMetrics;
use crate::requests::v1::user::UserCreateRequest;
use crate::responses::v1::user::User;
use crate::security::{PasswordHasher, Validator};

pub const EMAIL_INVALID: &str = "Enter a valid email address.";
pub const EMAIL_TAKEN: &str = "user with this email already exists.";

/// Register a new account
///
/// Every field error is collected before anything is written.
#[::tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn create(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    metrics: &AppMetrics,
    request: UserCreateRequest,
) -> Result<User, HttpError> {
    let mut validation = Validation::new();
    let email = request.email.trim().to_lowercase();
    let name = request.name.unwrap_or_default().trim().to_string();
    let password = request.password;

    if email.is_empty() {
        validation.add("email", REQUIRED);
    } else if !Validator::validate_email(&email) {
        validation.add("email", EMAIL_INVALID);
    } else if Model::email_exists(db, &email).await? {
        validation.add("email", EMAIL_TAKEN);
    }

    if let Err(errors) = Validator::validate_password(&password, config.min_password_length) {
        validation.extend("password", errors);
    }

    if let Err(errors) = Validator::validate_name(&name) {
        validation.extend("name", errors);
    }

    if !validation.is_empty() {
        ::tracing::debug!(fields = ?validation.errors().keys().collect::<Vec<_>>(), "Registration rejected");

        return Err(validation.into());
    }

    ::tracing::debug!("Hashing password with Argon2id");
    let password = hasher.hash(&password).map_err(HttpError::internal)?;

    let model = match Model::new(email, name, password).store(db).await {
        Ok(model) => model,
        // lost a race against a concurrent registration of the same email
        Err(e) if is_unique_violation(&e) => {
            let mut validation = Validation::new();
            validation.add("email", EMAIL_TAKEN);

            return Err(validation.into());
        }
        Err(e) => return Err(e.into()),
    };

    metrics.record_user_created();
    ::tracing::info!(user_id = %model.id, "User created");

    Ok(model.into())
}
