use std::collections::BTreeMap;

use actix_web::body::BoxBody;
use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const REQUIRED: &str = "This field is required.";

/// Field errors collected while validating a request payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Validation(BTreeMap<String, Vec<String>>);

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: ToString, M: ToString>(&mut self, field: F, message: M) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn extend<F: ToString>(&mut self, field: F, messages: Vec<String>) {
        let field = field.to_string();

        for message in messages {
            self.add(&field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

/// Body of every 4xx/5xx response produced by [`HttpError`]
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "The given data was invalid.")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Validation>,
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("The given data was invalid.")]
    Validation(Validation),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HttpError {
    pub fn unauthorized<T: ToString>(message: T) -> Self {
        Self::Unauthorized(message.to_string())
    }

    pub fn internal<T: std::fmt::Display>(message: T) -> Self {
        Self::Internal(anyhow::anyhow!("{}", message))
    }
}

impl From<Validation> for HttpError {
    fn from(validation: Validation) -> Self {
        Self::Validation(validation)
    }
}

impl From<JsonPayloadError> for HttpError {
    fn from(error: JsonPayloadError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<UrlencodedError> for HttpError {
    fn from(error: UrlencodedError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let body = match self {
            Self::Validation(validation) => ErrorResponse {
                message: self.to_string(),
                errors: Some(validation.clone()),
            },
            Self::Database(e) => {
                ::tracing::error!(error = %e, "Database error");

                ErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            Self::Internal(e) => {
                ::tracing::error!(error = ?e, "Internal error");

                ErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            _ => ErrorResponse {
                message: self.to_string(),
                errors: None,
            },
        };

        let mut response = HttpResponse::build(self.status_code());

        if let Self::Unauthorized(_) = self {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        response.json(body)
    }
}
