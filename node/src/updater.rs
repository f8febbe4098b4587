// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Atomic per-key increments on top of [`KeyedStore::transaction`].

use herostats_kernel::{AggregateKey, AggregateRecord, AggregateUpdate};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::store::{KeyedStore, RetryPolicy, StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("gave up on {key} after {attempts} conflicting attempts")]
    Exhausted { key: AggregateKey, attempts: u32 },

    #[error("update of {key} failed: {source}")]
    Store {
        key: AggregateKey,
        #[source]
        source: StoreError,
    },
}

impl UpdateError {
    pub fn key(&self) -> &AggregateKey {
        match self {
            UpdateError::Exhausted { key, .. } | UpdateError::Store { key, .. } => key,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, UpdateError::Exhausted { .. })
    }
}

/// A stored value that does not decode as a record counts as never written.
fn decode(current: Option<Value>) -> Option<AggregateRecord> {
    current.and_then(|v| serde_json::from_value(v).ok())
}

/// Applies one [`AggregateUpdate`] with optimistic concurrency. Calls for
/// different keys are independent; there is no cross-key transaction.
#[derive(Clone)]
pub struct AggregateUpdater {
    store: Arc<dyn KeyedStore>,
    policy: RetryPolicy,
}

impl AggregateUpdater {
    pub fn new(store: Arc<dyn KeyedStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the record as written.
    pub async fn apply(&self, update: &AggregateUpdate) -> Result<AggregateRecord, UpdateError> {
        let path = update.key.path();
        let increment = update.increment;
        let apply = move |current: Option<Value>| -> StoreResult<Value> {
            Ok(serde_json::to_value(increment.apply(decode(current)))?)
        };

        let result = self.store.transaction(&path, self.policy, &apply).await;
        let outcome = match result {
            Ok(written) => serde_json::from_value(written).map_err(|e| UpdateError::Store {
                key: update.key.clone(),
                source: e.into(),
            }),
            Err(StoreError::RetriesExhausted { attempts, .. }) => Err(UpdateError::Exhausted {
                key: update.key.clone(),
                attempts,
            }),
            Err(source) => Err(UpdateError::Store {
                key: update.key.clone(),
                source,
            }),
        };

        match &outcome {
            Ok(_) => {
                metrics::increment_counter!("herostats_aggregate_updates_total", "result" => "ok");
            }
            Err(e) => {
                tracing::warn!(key = %update.key, error = %e, "aggregate update failed");
                metrics::increment_counter!("herostats_aggregate_updates_total", "result" => "error");
            }
        }
        outcome
    }
}
