use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public representation of a user, the password hash never leaves the model
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct User {
    #[schema(example = "myemail@mail.com")]
    pub email: String,
    #[schema(example = "stark")]
    pub name: String,
}
