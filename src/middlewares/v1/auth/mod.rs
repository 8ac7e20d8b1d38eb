pub mod authenticated;
pub mod internal;

pub use authenticated::Authenticated;
pub use internal::Auth;
