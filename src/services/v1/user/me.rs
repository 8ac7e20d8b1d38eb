use crate::error::HttpError;
use crate::middlewares::v1::auth::Auth;
use crate::responses::v1::user::User;

#[::tracing::instrument(skip(auth), fields(user_id = %auth.user.id))]
pub async fn me(auth: Auth) -> Result<User, HttpError> {
    Ok(auth.user.into())
}
