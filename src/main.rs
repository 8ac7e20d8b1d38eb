use std::time::Duration;

use account_api::config::{self, AppConfig};
use account_api::metrics::{AppMetrics, MetricsMiddleware};
use account_api::middlewares::v1::auth::Authenticated;
use account_api::security::PasswordHasher;
use account_api::{database, logging, router};
use account_api_migration::{Migrator, MigratorTrait};
use actix_cors::Cors;
use actix_web::middleware::{Condition, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

/// How often expired entries are swept from the session cache
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("Failed to load configuration")?;

    logging::init(&config.logging)?;

    ::tracing::info!(
        name = %config.app.name,
        environment = %config.app.environment,
        "Starting service"
    );

    let db = database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
    }

    let hasher = PasswordHasher::from_config(&config.auth)
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {}", e))?;
    let cached = Authenticated::new(Duration::from_secs(config.auth.session_cache_ttl));
    let metrics = AppMetrics::new();

    spawn_cache_purge(cached.clone());

    serve(config, db, hasher, cached, metrics).await
}

fn spawn_cache_purge(cached: Authenticated) {
    actix::spawn(async move {
        let mut interval = actix::clock::interval(CACHE_PURGE_INTERVAL);

        loop {
            interval.tick().await;

            let purged = cached.purge_expired();
            if purged > 0 {
                ::tracing::debug!(purged, "Purged expired sessions");
            }
        }
    });
}

fn cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

async fn serve(
    config: AppConfig,
    db: sea_orm::DatabaseConnection,
    hasher: PasswordHasher,
    cached: Authenticated,
    metrics: AppMetrics,
) -> anyhow::Result<()> {
    let address = (config.server.host.clone(), config.server.port);
    let metrics_enabled = config.metrics.enabled;
    let origins = config.server.cors_origins.clone();

    let db = Data::new(db);
    let hasher = Data::new(hasher);
    let auth = Data::new(config.auth.clone());
    let cached = Data::new(cached);
    let metrics = Data::new(metrics);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(
                metrics_enabled,
                MetricsMiddleware::new(metrics.get_ref().clone()),
            ))
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(hasher.clone())
            .app_data(auth.clone())
            .app_data(cached.clone())
            .app_data(metrics.clone())
            .configure(|app| {
                if metrics_enabled {
                    router::metrics(app);
                }
            })
            .configure(router::route)
    });

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    ::tracing::info!(host = %address.0, port = address.1, "Listening");

    server
        .bind(address)
        .context("Failed to bind server address")?
        .run()
        .await
        .context("Server error")
}
