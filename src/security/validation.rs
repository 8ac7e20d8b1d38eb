use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::REQUIRED;

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 255;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Requires at least one dot after @ for the TLD
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .unwrap()
});

/// Field rules shared by registration and profile update
pub struct Validator;

impl Validator {
    /// Validates email address format
    ///
    /// # Example
    /// ```
    /// use account_api::security::Validator;
    ///
    /// assert!(Validator::validate_email("stark@mail.com"));
    /// assert!(!Validator::validate_email("invalid-email"));
    /// ```
    pub fn validate_email(email: &str) -> bool {
        if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
            return false;
        }

        if email.contains("..") {
            return false;
        }

        EMAIL_REGEX.is_match(email)
    }

    /// Validates a plaintext password against the configured minimum length
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Example
    /// ```
    /// use account_api::security::Validator;
    ///
    /// assert!(Validator::validate_password("test123", 6).is_ok());
    /// assert!(Validator::validate_password("pw", 6).is_err());
    /// ```
    pub fn validate_password(password: &str, min_length: usize) -> Result<(), Vec<String>> {
        if password.is_empty() {
            return Err(vec![REQUIRED.to_string()]);
        }

        if password.chars().count() < min_length {
            return Err(vec![format!(
                "Ensure this field has at least {} characters.",
                min_length
            )]);
        }

        Ok(())
    }

    pub fn validate_name(name: &str) -> Result<(), Vec<String>> {
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(vec![format!(
                "Ensure this field has no more than {} characters.",
                MAX_NAME_LENGTH
            )]);
        }

        Ok(())
    }
}
