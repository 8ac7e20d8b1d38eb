use actix_web::web::{Either, Form, Json};

pub mod v1;

/// Request body sent either as JSON or as `application/x-www-form-urlencoded`
pub type Payload<T> = Either<Json<T>, Form<T>>;
