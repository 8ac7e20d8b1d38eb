use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Missing fields deserialize to empty strings and are reported by the
/// service as field errors rather than as a malformed payload.
#[derive(Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserCreateRequest {
    #[serde(default)]
    #[schema(example = "myemail@mail.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "test123")]
    pub password: String,
    #[serde(default)]
    #[schema(example = "stark")]
    pub name: Option<String>,
}

/// Partial update of the authenticated user's profile
#[derive(Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "stark")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "newpassword123")]
    pub password: Option<String>,
}
