use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString},
};

use crate::config::auth::AuthConfig;

/// Argon2id password hasher
///
/// Hashes are stored in PHC string format, so the salt and the parameters
/// travel with the hash:
/// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`
///
/// # Example
/// ```no_run
/// use account_api::config::AuthConfig;
/// use account_api::security::PasswordHasher;
///
/// let hasher = PasswordHasher::from_config(&AuthConfig::default()).unwrap();
/// let hash = hasher.hash("test123").unwrap();
///
/// assert!(hasher.verify("test123", &hash).unwrap());
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from the `auth.argon2` parameters
    ///
    /// # Errors
    /// Returns error if Argon2 parameters are invalid (e.g., memory cost too low)
    #[tracing::instrument(skip(config))]
    pub fn from_config(config: &AuthConfig) -> Result<Self, argon2::password_hash::Error> {
        let params = Params::new(
            config.argon2.memory_cost,
            config.argon2.time_cost,
            config.argon2.parallelism,
            Some(config.argon2.hash_length as usize),
        )?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self { argon2 })
    }

    /// Hash a password with a freshly generated salt
    #[tracing::instrument(skip(self, password))]
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a password against a PHC hash
    ///
    /// * `Ok(true)` - Password matches hash
    /// * `Ok(false)` - Password does not match hash
    /// * `Err(_)` - The stored hash is malformed
    #[tracing::instrument(skip(self, password, hash))]
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check whether a hash was produced with other parameters than ours
    ///
    /// Called after a successful credential check so that stored hashes
    /// follow configuration changes.
    #[tracing::instrument(skip(self, hash))]
    pub fn needs_rehash(&self, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;

        if parsed_hash.algorithm.as_str() != "argon2id" {
            return Ok(true);
        }

        let m_cost = parsed_hash.params.get_decimal("m").unwrap_or(0);
        let t_cost = parsed_hash.params.get_decimal("t").unwrap_or(0);
        let p_cost = parsed_hash.params.get_decimal("p").unwrap_or(0);

        let current = self.argon2.params();

        Ok(m_cost != current.m_cost() || t_cost != current.t_cost() || p_cost != current.p_cost())
    }
}
