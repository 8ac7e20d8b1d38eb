//! Liveness and database connectivity probes

use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder, get};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Liveness check
///
/// Always 200 while the process serves requests, no dependency is touched.
#[utoipa::path(
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = LivenessResponse),
    )
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    Json(LivenessResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// Health check including database connectivity
#[utoipa::path(
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = DatabaseHealthResponse),
        (status = 503, description = "Database unavailable", body = DatabaseHealthResponse),
    )
)]
#[get("/health/db")]
pub async fn health_db(db: Data<DatabaseConnection>) -> impl Responder {
    let connected = match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            ::tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    let response = DatabaseHealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    };

    if connected {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
