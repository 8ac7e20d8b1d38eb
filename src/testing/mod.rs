pub mod instance;
pub mod setup;
