use account_api_migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};

use crate::config::{Argon2Config, AuthConfig, DatabaseConfig};
use crate::database;
use crate::entities::v1::{tokens, users};
use crate::security::PasswordHasher;

/// Returns an in-memory SQLite database with all migrations applied
///
/// A single pooled connection keeps the in-memory schema alive for the
/// lifetime of the returned handle, so every call is an isolated database.
///
/// # Panics
/// Panics if the connection or a migration fails.
pub async fn database() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };

    let db = database::connect(&config)
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Auth configuration with reduced Argon2 cost
///
/// - memory_cost: 19456 KB instead of 64 MB
/// - time_cost: 1 iteration instead of 3
/// - parallelism: 1 lane instead of 4
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        argon2: Argon2Config {
            memory_cost: 19456,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
        },
        ..AuthConfig::default()
    }
}

pub fn password_hasher() -> PasswordHasher {
    PasswordHasher::from_config(&auth_config()).expect("Failed to build password hasher")
}

/// Insert an active user with a hashed password
pub async fn create_user(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<users::Model, DbErr> {
    let password = hasher.hash(password).expect("Failed to hash password");

    users::Model::new(email, "Test User", password).store(db).await
}

/// Issue (or reuse) a token for `user` without going through the endpoint
pub async fn token(db: &DatabaseConnection, user: &users::Model) -> String {
    tokens::Model::get_or_create(db, user.id, None)
        .await
        .expect("Failed to issue token")
        .key
}
