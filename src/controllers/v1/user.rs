use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder, post};
use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::error::{ErrorResponse, HttpError};
use crate::metrics::AppMetrics;
use crate::middlewares::v1::auth::{Auth, Authenticated as Cache};
use crate::requests::Payload;
use crate::requests::v1::user::{UserCreateRequest, UserUpdateRequest};
use crate::responses::v1::user::User;
use crate::security::PasswordHasher;
use crate::services;

/// Register a new user
///
/// Fail if
/// - email is missing, malformed or already registered
/// - password is shorter than the configured minimum
#[utoipa::path(
    tag = "User",
    request_body = UserCreateRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
)]
#[post("/user/create/")]
pub async fn create(
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    config: Data<AuthConfig>,
    metrics: Data<AppMetrics>,
    request: Payload<UserCreateRequest>,
) -> Result<impl Responder, HttpError> {
    let response =
        services::v1::user::create::create(&db, &hasher, &config, &metrics, request.into_inner())
            .await?;

    Ok(HttpResponse::Created().json(response))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/user/me/",
    tag = "User",
    security(("token" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn me(auth: Auth) -> Result<impl Responder, HttpError> {
    let response = services::v1::user::me::me(auth).await?;

    Ok(Json(response))
}

/// Update name and/or password of the authenticated user
///
/// Fail if password is shorter than the configured minimum
#[utoipa::path(
    patch,
    path = "/user/me/",
    tag = "User",
    security(("token" = [])),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn update(
    auth: Auth,
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    config: Data<AuthConfig>,
    cached: Data<Cache>,
    request: Payload<UserUpdateRequest>,
) -> Result<impl Responder, HttpError> {
    let response = services::v1::user::update::update(
        &db,
        &hasher,
        &config,
        &cached,
        auth,
        request.into_inner(),
    )
    .await?;

    Ok(Json(response))
}
