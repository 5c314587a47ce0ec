//! Single-flight execution of keyed work.
//!
//! Concurrent callers that share a key must not duplicate expensive
//! translation work: the first caller registers a shared settlement future
//! for the key and every later caller awaits the same future. The work is
//! spawned onto the runtime, so a caller that stops waiting (request-level
//! timeout, dropped connection) does not cancel the run; it still completes
//! and populates the store for future callers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::error::{GlossaError, Result};

type Settlement<T> = Shared<BoxFuture<'static, std::result::Result<T, Arc<GlossaError>>>>;
type InflightTable<T> = Arc<Mutex<HashMap<String, Settlement<T>>>>;

/// Deduplicates concurrent executions of identical work by key.
///
/// The in-flight table is the only shared state; registration and release
/// are atomic under its mutex, so two callers can never both become the
/// leader for one key. Keys are released as soon as their work settles —
/// result caching is the store's job, not the bundler's.
pub struct RequestBundler<T: Clone + Send + Sync + 'static> {
    inflight: InflightTable<T>,
}

impl<T: Clone + Send + Sync + 'static> Default for RequestBundler<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn release_key<T: Clone + Send + Sync + 'static>(
    inflight: &InflightTable<T>,
    key: &str,
    settlement: &Settlement<T>,
) {
    // Remove the key only if it still refers to this execution; another
    // caller may already have registered a fresh one.
    let mut table = inflight
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(current) = table.get(key) {
        if current.ptr_eq(settlement) {
            table.remove(key);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> RequestBundler<T> {
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `work` for `key`, or join an execution already in flight.
    ///
    /// Exactly one execution of `work` happens per key at a time; all
    /// callers receive the identical settled outcome. After settlement the
    /// key is released regardless of success or failure, so a later call
    /// starts a fresh execution.
    pub async fn run<F>(&self, key: &str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let settlement = {
            let mut table = self
                .inflight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(existing) = table.get(key) {
                debug!("Joining in-flight execution for key {}", key);
                existing.clone()
            } else {
                let handle = tokio::spawn(work);
                let settlement: Settlement<T> = async move {
                    match handle.await {
                        Ok(outcome) => outcome.map_err(Arc::new),
                        Err(join_error) => Err(Arc::new(GlossaError::Store(format!(
                            "Bundled work aborted: {}",
                            join_error
                        )))),
                    }
                }
                .boxed()
                .shared();
                table.insert(key.to_string(), settlement.clone());

                // Guarantee release even when every waiter gives up before
                // settlement; otherwise a settled value would stay joinable.
                let janitor_table = Arc::clone(&self.inflight);
                let janitor_key = key.to_string();
                let janitor_settlement = settlement.clone();
                tokio::spawn(async move {
                    let _ = janitor_settlement.clone().await;
                    release_key(&janitor_table, &janitor_key, &janitor_settlement);
                });

                settlement
            }
        };

        let outcome = settlement.clone().await;
        release_key(&self.inflight, key, &settlement);

        outcome.map_err(|shared_error| match Arc::try_unwrap(shared_error) {
            Ok(error) => error,
            Err(still_shared) => GlossaError::Bundled(still_shared),
        })
    }

    /// Number of keys currently in flight.
    pub fn inflight_len(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
