use actix_web::{Responder, post};
use actix_web::web::{Data, Json};
use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::error::{ErrorResponse, HttpError};
use crate::metrics::AppMetrics;
use crate::requests::Payload;
use crate::requests::v1::auth::TokenRequest;
use crate::responses::v1::auth::Token;
use crate::security::PasswordHasher;
use crate::services;

/// Obtain an authentication token
///
/// The same token is returned until it expires.
///
/// Fail if
/// - email or password is missing
/// - credentials do not match an active user
#[utoipa::path(
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = Token),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/user/token/")]
pub async fn token(
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    config: Data<AuthConfig>,
    metrics: Data<AppMetrics>,
    request: Payload<TokenRequest>,
) -> Result<impl Responder, HttpError> {
    let response =
        services::v1::auth::token::token(&db, &hasher, &config, &metrics, request.into_inner())
            .await?;

    Ok(Json(response))
}
