use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Upper bound for `token_expiration`, ten years
const MAX_TOKEN_EXPIRATION: u64 = 10 * 365 * 24 * 60 * 60;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token lifetime in seconds, tokens never expire when unset
    #[serde(default)]
    pub token_expiration: Option<u64>,
    /// How long a resolved token stays in the session cache, in seconds
    #[serde(default = "default_session_cache_ttl")]
    pub session_cache_ttl: u64,
    /// Minimum password length, in characters
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Argon2 configuration
    #[serde(default = "Argon2Config::default")]
    pub argon2: Argon2Config,
}

/// Argon2 password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Memory cost in KB (64MB = 65536 KB)
    #[serde(default = "default_argon2_memory_cost")]
    pub memory_cost: u32,
    /// Time cost (iterations)
    #[serde(default = "default_argon2_time_cost")]
    pub time_cost: u32,
    /// Parallelism (number of lanes)
    #[serde(default = "default_argon2_parallelism")]
    pub parallelism: u32,
    /// Hash length in bytes
    #[serde(default = "default_argon2_hash_length")]
    pub hash_length: u32,
}

fn default_session_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_min_password_length() -> usize {
    6
}

fn default_argon2_memory_cost() -> u32 {
    65536 // 64 MB
}

fn default_argon2_time_cost() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_argon2_hash_length() -> u32 {
    32
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> Option<TimeDelta> {
        self.token_expiration
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(TimeDelta::try_seconds)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_expiration: None,
            session_cache_ttl: default_session_cache_ttl(),
            min_password_length: default_min_password_length(),
            argon2: Argon2Config::default(),
        }
    }
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: default_argon2_memory_cost(),
            time_cost: default_argon2_time_cost(),
            parallelism: default_argon2_parallelism(),
            hash_length: default_argon2_hash_length(),
        }
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(expiration) = self.token_expiration {
            if expiration == 0 {
                return Err(ConfigError::ValidationError("auth.token_expiration must be > 0".to_string()));
            }
            if expiration > MAX_TOKEN_EXPIRATION {
                return Err(ConfigError::ValidationError(format!(
                    "auth.token_expiration must be <= {}",
                    MAX_TOKEN_EXPIRATION
                )));
            }
        }
        if self.session_cache_ttl == 0 {
            return Err(ConfigError::ValidationError("auth.session_cache_ttl must be > 0".to_string()));
        }
        if self.min_password_length == 0 {
            return Err(ConfigError::ValidationError("auth.min_password_length must be > 0".to_string()));
        }
        self.argon2.validate()?;
        Ok(())
    }
}

impl Validate for Argon2Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.time_cost == 0 {
            return Err(ConfigError::ValidationError("auth.argon2.time_cost must be > 0".to_string()));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ValidationError("auth.argon2.parallelism must be > 0".to_string()));
        }
        // argon2 requires at least 8 KiB per lane
        if self.memory_cost < 8 * self.parallelism {
            return Err(ConfigError::ValidationError(
                "auth.argon2.memory_cost must be >= 8 * parallelism".to_string(),
            ));
        }
        if self.hash_length < 4 {
            return Err(ConfigError::ValidationError("auth.argon2.hash_length must be >= 4".to_string()));
        }
        Ok(())
    }
}
