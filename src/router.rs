use actix_web::web::{self, FormConfig, JsonConfig, ServiceConfig};
use utoipa::OpenApi;
use utoipa_swagger_ui::{SwaggerUi, Url};

use crate::api::Definition;
use crate::controllers;
use crate::error::HttpError;

pub fn route(app: &mut ServiceConfig) {
    app.app_data(JsonConfig::default().error_handler(|err, _| HttpError::from(err).into()));
    app.app_data(FormConfig::default().error_handler(|err, _| HttpError::from(err).into()));
    // User
    app.service(controllers::v1::user::create);
    // other methods on the profile resource answer 405
    app.service(
        web::resource("/user/me/")
            .route(web::get().to(controllers::v1::user::me))
            .route(web::patch().to(controllers::v1::user::update)),
    );
    // Auth
    app.service(controllers::v1::auth::token);

    app.service(controllers::health::health);
    app.service(controllers::health::health_db);

    // must at the end!
    app.service(web::redirect("/docs", "/docs/"));
    app.service(SwaggerUi::new("/docs/{_:.*}").urls(vec![(
        Url::new("Account", "/api.json"),
        Definition::openapi(),
    )]));
}

/// Prometheus scrape endpoint, mounted only when `metrics.enabled` is set
pub fn metrics(app: &mut ServiceConfig) {
    app.service(controllers::metrics::metrics);
}
