use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::entities::v1::users::Model;
use crate::error::{HttpError, Validation};
use crate::middlewares::v1::auth::{Auth, Authenticated};
use crate::requests::v1::user::UserUpdateRequest;
use crate::responses::v1::user::User;
use crate::security::{PasswordHasher, Validator};

/// Partially update the caller's profile
///
/// Only `name` and `password` are writable. The caller keeps their token,
/// but cached sessions are dropped so the next request reads the new row.
#[::tracing::instrument(skip_all, fields(user_id = %auth.user.id))]
pub async fn update(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    cached: &Authenticated,
    auth: Auth,
    request: UserUpdateRequest,
) -> Result<User, HttpError> {
    let mut validation = Validation::new();
    let name = request.name.map(|name| name.trim().to_string());

    if let Some(Err(errors)) = name.as_deref().map(Validator::validate_name) {
        validation.extend("name", errors);
    }

    if let Some(Err(errors)) = request
        .password
        .as_deref()
        .map(|password| Validator::validate_password(password, config.min_password_length))
    {
        validation.extend("password", errors);
    }

    if !validation.is_empty() {
        return Err(validation.into());
    }

    let user = Model::find_by_id(db, auth.user.id)
        .await?
        .ok_or_else(|| HttpError::NotFound("User not found.".to_string()))?;

    let password = match request.password {
        Some(password) => Some(hasher.hash(&password).map_err(HttpError::internal)?),
        None => None,
    };
    let changed_password = password.is_some();

    let user = user.update_profile(db, name, password).await?;

    cached.forget_user(user.id);
    ::tracing::info!(changed_password, "Profile updated");

    Ok(user.into())
}
