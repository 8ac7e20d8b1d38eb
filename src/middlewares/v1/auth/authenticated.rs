use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sea_orm::prelude::{DateTime, Uuid};

use super::internal::Auth;
use crate::helpers::now;

#[derive(Clone, Debug)]
struct Entry {
    auth: Auth,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache of resolved tokens
///
/// An entry never outlives the token it was built from.
#[derive(Clone, Debug)]
pub struct Authenticated {
    entries: Arc<DashMap<String, Entry>>,
    ttl: Duration,
}

impl Authenticated {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    #[::tracing::instrument(skip_all)]
    pub fn get(&self, token: &str) -> Option<Auth> {
        let entry = self.entries.get(token)?;

        if entry.is_expired() {
            drop(entry);
            self.entries.remove(token);
            ::tracing::debug!("Auth cache entry expired");

            return None;
        }

        ::tracing::debug!(user_id = %entry.auth.user.id, "Auth cache hit");

        Some(entry.auth.clone())
    }

    /// Cache `auth` until the configured ttl or the token expiry, whichever comes first
    #[::tracing::instrument(skip_all, fields(user_id = %auth.user.id))]
    pub fn set(&self, auth: &Auth, token_expired_at: Option<DateTime>) {
        let mut ttl = self.ttl;

        if let Some(expired_at) = token_expired_at {
            let remaining = (expired_at - now()).to_std().unwrap_or(Duration::ZERO);
            ttl = ttl.min(remaining);
        }

        if ttl.is_zero() {
            return;
        }

        self.entries.insert(
            auth.token.clone(),
            Entry {
                auth: auth.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every cached session of a user, used after the profile changes
    #[::tracing::instrument(skip(self))]
    pub fn forget_user(&self, user_id: Uuid) {
        self.entries.retain(|_, entry| entry.auth.user.id != user_id);
    }

    /// Evict expired entries, returns how many were dropped
    ///
    /// Safe to call while requests keep inserting: only removals are counted.
    pub fn purge_expired(&self) -> usize {
        let mut purged = 0;

        self.entries.retain(|_, entry| {
            let expired = entry.is_expired();
            if expired {
                purged += 1;
            }

            !expired
        });

        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
