/// Build an initialized test service over a fresh in-memory database
///
/// Returns `(service, db)`. An explicit [`AuthConfig`](crate::config::AuthConfig)
/// may be passed to exercise token expiry or password rules.
#[macro_export]
macro_rules! service {
    () => {
        $crate::service!($crate::testing::setup::auth_config())
    };
    ($config:expr) => {{
        let config: $crate::config::AuthConfig = $config;
        let db = $crate::testing::setup::database().await;
        let hasher = $crate::security::PasswordHasher::from_config(&config)
            .expect("Failed to build password hasher");
        let cached = $crate::middlewares::v1::auth::Authenticated::new(
            ::std::time::Duration::from_secs(config.session_cache_ttl),
        );
        let app = ::actix_web::App::new()
            .app_data(::actix_web::web::Data::new(db.clone()))
            .app_data(::actix_web::web::Data::new(hasher))
            .app_data(::actix_web::web::Data::new(config))
            .app_data(::actix_web::web::Data::new(cached))
            .app_data(::actix_web::web::Data::new($crate::metrics::AppMetrics::new()))
            .configure($crate::router::metrics)
            .configure($crate::router::route);

        let service = ::actix_web::test::init_service(app).await;

        (service, db)
    }};
}
