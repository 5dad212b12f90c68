//! Process-wide signing key cache.
//!
//! The cached set is an immutable `Arc<SigningKeySet>` snapshot. A refresh
//! builds a new snapshot and swaps the pointer, so readers always see either
//! the old or the new set in full.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::error::AuthError;
use super::key_source::KeySource;
use super::keys::SigningKeySet;

#[derive(Debug, Clone, Copy)]
pub struct KeyCachePolicy {
    // Snapshots older than this are refetched before use.
    pub ttl: Duration,
    // A `kid` miss only triggers a refetch when the snapshot is at least this old.
    pub min_refresh_interval: Duration,
}

struct Snapshot {
    keys: Arc<SigningKeySet>,
    fetched_at: Instant,
}

pub struct KeyCache {
    source: Arc<dyn KeySource>,
    policy: KeyCachePolicy,
    current: RwLock<Option<Arc<Snapshot>>>,
    refresh: Mutex<()>,
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("policy", &self.policy)
            .finish()
    }
}

impl KeyCache {
    pub fn new(source: Arc<dyn KeySource>, policy: KeyCachePolicy) -> Self {
        Self {
            source,
            policy,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Key set to verify a token announcing `kid`.
    ///
    /// Serves the cached snapshot when it is fresh and knows `kid`; otherwise
    /// refreshes it (subject to the policy) and returns whatever the authority
    /// currently publishes. The returned set may still lack `kid`; the verifier
    /// reports that as `InvalidKey`.
    pub async fn keys_for(&self, kid: &str) -> Result<Arc<SigningKeySet>, AuthError> {
        let seen = self.current.read().await.clone();

        if let Some(snap) = &seen
            && !self.is_expired(snap)
            && snap.keys.contains(kid)
        {
            return Ok(snap.keys.clone());
        }

        self.refresh(seen.as_ref()).await
    }

    fn is_expired(&self, snap: &Snapshot) -> bool {
        snap.fetched_at.elapsed() >= self.policy.ttl
    }

    async fn refresh(&self, seen: Option<&Arc<Snapshot>>) -> Result<Arc<SigningKeySet>, AuthError> {
        let _guard = self.refresh.lock().await;

        // Another task may have refreshed while we waited for the lock.
        let latest = self.current.read().await.clone();
        if let Some(latest) = &latest {
            let replaced = seen.is_none_or(|seen| !Arc::ptr_eq(seen, latest));
            if replaced && !self.is_expired(latest) {
                return Ok(latest.keys.clone());
            }

            if !self.is_expired(latest)
                && latest.fetched_at.elapsed() < self.policy.min_refresh_interval
            {
                tracing::debug!("signing keys refreshed recently, not refetching on kid miss");
                return Ok(latest.keys.clone());
            }
        }

        let keys = match self.source.fetch_signing_keys().await {
            Ok(keys) => Arc::new(keys),
            Err(err) => {
                tracing::warn!(error = %err, "signing key refresh failed");
                return Err(err);
            }
        };

        tracing::info!(keys = keys.len(), "signing keys refreshed");

        let snapshot = Arc::new(Snapshot {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        *self.current.write().await = Some(snapshot);

        Ok(keys)
    }
}
