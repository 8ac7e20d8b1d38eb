use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct TokenRequest {
    #[serde(default)]
    #[schema(example = "stark@mail.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "test123")]
    pub password: String,
}
