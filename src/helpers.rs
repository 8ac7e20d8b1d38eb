use sea_orm::prelude::DateTime;
use sea_orm::{DbErr, SqlErr};

/// Current UTC time as stored in timestamp columns
pub fn now() -> DateTime {
    chrono::Utc::now().naive_utc()
}

pub fn is_unique_violation(error: &DbErr) -> bool {
    matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
