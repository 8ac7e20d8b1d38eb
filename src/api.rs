use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::{controllers, error, requests, responses};

/// Registers the `token` security scheme referenced by authenticated paths
pub struct Authentication;

impl Modify for Authentication {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token returned by `POST /user/token/`"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Auth"),
        (name = "User"),
        (name = "Health"),
    ),
    modifiers(&Authentication),
    paths(
        controllers::v1::user::create,
        controllers::v1::user::me,
        controllers::v1::user::update,

        controllers::v1::auth::token,

        controllers::health::health,
        controllers::health::health_db,
    ),
    components(schemas(
        requests::v1::auth::TokenRequest,
        requests::v1::user::UserCreateRequest,
        requests::v1::user::UserUpdateRequest,

        responses::v1::auth::Token,
        responses::v1::user::User,

        error::ErrorResponse,
        error::Validation,

        controllers::health::LivenessResponse,
        controllers::health::DatabaseHealthResponse,
    )),
)]
pub struct Definition;
