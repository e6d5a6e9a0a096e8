//! TTL cache with in-flight request sharing
//!
//! `resolve` serves a fresh committed value, or joins the pending computation
//! for the key, or starts one. A computation runs as a single spawned task
//! whose shared result every joined caller receives. Only successes are
//! committed; the in-flight slot is cleared either way.
//!
//! Stale entries are dropped lazily on lookup. Nothing sweeps the map, so it
//! grows with the number of distinct keys over the process lifetime.

use crate::nearby::UpstreamError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

type Outcome<V> = Result<V, UpstreamError>;
type PendingFetch<V> = Shared<BoxFuture<'static, Outcome<V>>>;

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    in_flight: HashMap<String, PendingFetch<V>>,
}

/// Committed results plus pending computations, keyed by request
pub struct RequestCache<V> {
    ttl: Duration,
    // Never held across an await.
    state: Arc<Mutex<CacheState<V>>>,
}

impl<V> RequestCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, or the result of the single
    /// computation shared by all concurrent callers of `key`
    ///
    /// `compute` is only called when neither a fresh entry nor a pending
    /// computation exists.
    pub async fn resolve<F, Fut>(&self, key: &str, compute: F) -> Outcome<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome<V>> + Send + 'static,
    {
        let pending = {
            let mut state = lock(&self.state);

            if let Some(value) = state.fresh(key, self.ttl) {
                debug!(key, "Nearby cache hit");
                return Ok(value);
            }

            match state.in_flight.get(key) {
                Some(pending) => {
                    debug!(key, "Joining in-flight request");
                    pending.clone()
                }
                None => {
                    let pending = self.settle(key.to_string(), compute());
                    state.in_flight.insert(key.to_string(), pending.clone());
                    tokio::spawn(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Wrap a computation so that it clears its in-flight slot and commits on success
    fn settle<Fut>(&self, key: String, fut: Fut) -> PendingFetch<V>
    where
        Fut: Future<Output = Outcome<V>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);

        async move {
            let outcome = fut.await;

            let mut state = lock(&state);
            state.in_flight.remove(&key);
            if let Ok(value) = &outcome {
                state.entries.insert(
                    key,
                    CacheEntry {
                        inserted_at: Instant::now(),
                        value: value.clone(),
                    },
                );
            }

            outcome
        }
        .boxed()
        .shared()
    }

    /// Number of committed entries, stale ones included
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of computations still pending
    pub fn in_flight(&self) -> usize {
        lock(&self.state).in_flight.len()
    }
}

impl<V: Clone> CacheState<V> {
    /// Fresh value for `key`, evicting it if expired
    fn fresh(&mut self, key: &str, ttl: Duration) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() < ttl {
            return Some(entry.value.clone());
        }

        self.entries.remove(key);
        None
    }
}

fn lock<V>(state: &Mutex<CacheState<V>>) -> MutexGuard<'_, CacheState<V>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
