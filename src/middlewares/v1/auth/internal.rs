use std::time::Instant;

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;

use super::authenticated::Authenticated;
use crate::entities::v1::{tokens, users};
use crate::error::HttpError;

/// Authorization schemes accepted in front of the token
const SCHEMES: [&str; 2] = ["Bearer", "Token"];

/// The caller behind a valid token
///
/// Extracting `Auth` in a handler makes the route require authentication:
/// missing, malformed, unknown or expired tokens are answered with 401.
#[derive(Clone, Debug)]
pub struct Auth {
    pub token: String,
    pub user: users::Model,
}

/// Pull the token out of `Authorization: Bearer <token>` (or `Token <token>`)
pub fn token_from_headers(headers: &HeaderMap) -> Result<String, HttpError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| HttpError::unauthorized("Authentication credentials were not provided."))?;

    let header = header
        .to_str()
        .map_err(|_| HttpError::unauthorized("Invalid token header. Token string should not contain invalid characters."))?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next().unwrap_or_default();

    if !SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return Err(HttpError::unauthorized("Authentication credentials were not provided."));
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token.to_string()),
        (None, _) => Err(HttpError::unauthorized("Invalid token header. No credentials provided.")),
        (Some(_), Some(_)) => Err(HttpError::unauthorized(
            "Invalid token header. Token string should not contain spaces.",
        )),
    }
}

impl FromRequest for Auth {
    type Error = HttpError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let start = Instant::now();
        let db = req.app_data::<Data<DatabaseConnection>>().cloned();
        let authenticated = req.app_data::<Data<Authenticated>>().cloned();
        let token = token_from_headers(req.headers());

        Box::pin(async move {
            let (Some(db), Some(authenticated)) = (db, authenticated) else {
                return Err(HttpError::internal("Authentication state is not configured"));
            };

            let token = token?;

            if let Some(auth) = authenticated.get(&token) {
                ::tracing::debug!("Authentication took: {:?}", start.elapsed());

                return Ok(auth);
            }

            let Some((model, user)) = tokens::Model::find_with_user(&db, &token).await? else {
                ::tracing::debug!("Token not found");

                return Err(HttpError::unauthorized("Invalid token."));
            };

            if model.is_expired() {
                ::tracing::debug!(user_id = %user.id, "Token expired");

                return Err(HttpError::unauthorized("Token has expired."));
            }

            if !user.is_active {
                ::tracing::debug!(user_id = %user.id, "User is inactive");

                return Err(HttpError::unauthorized("User inactive or deleted."));
            }

            let auth = Auth { token, user };
            authenticated.set(&auth, model.expired_at);

            ::tracing::debug!("Authentication took: {:?}", start.elapsed());

            Ok(auth)
        })
    }
}
