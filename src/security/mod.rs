pub mod password;
pub mod validation;

pub use password::PasswordHasher;
pub use validation::Validator;
