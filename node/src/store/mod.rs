// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared keyed store.
//!
//! Aggregates live in a tree addressed by `/`-separated paths
//! (`matchUp/Tracer-vs-Widowmaker`). Backends provide plain reads, an
//! append-only `push`, and a conditional write keyed on an opaque revision.
//! The optimistic read-apply-write loop is [`KeyedStore::transaction`], shared
//! by every backend.

pub mod memory;
pub mod rtdb;

pub use memory::MemoryStore;
pub use rtdb::RtdbStore;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("transaction on {path} gave up after {attempts} attempts")]
    RetriesExhausted { path: String, attempts: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store answered {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("store sent no ETag for {0}")]
    MissingRevision(String),

    #[error("malformed revision {0:?}")]
    InvalidRevision(String),

    #[error("unexpected value shape at {0}")]
    UnexpectedShape(String),

    #[error("invalid store URL {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque token identifying the state of one path at read time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision(pub String);

/// A read that can be followed by a conditional write.
#[derive(Clone, Debug)]
pub struct Versioned {
    pub value: Option<Value>,
    pub revision: Revision,
}

/// Retry budget for [`KeyedStore::transaction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total read-apply-write cycles before giving up.
    pub max_attempts: u32,
    /// Sleep after the n-th conflict is `n * backoff`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 25,
            backoff: Duration::from_millis(5),
        }
    }
}

/// Computes the new value of a path from its current one.
pub type TransactionFn<'a> = dyn Fn(Option<Value>) -> StoreResult<Value> + Send + Sync + 'a;

#[async_trait]
pub trait KeyedStore: Send + Sync {
    /// Value at `path`. For a prefix this is the object of its children;
    /// `None` when nothing has been written there.
    async fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Appends `value` under `collection` and returns the generated child key.
    /// Keys sort in append order.
    async fn push(&self, collection: &str, value: Value) -> StoreResult<String>;

    async fn read_versioned(&self, path: &str) -> StoreResult<Versioned>;

    /// Writes `value` only if `path` is still at `expected`. `Ok(false)` means
    /// another writer got there first.
    async fn write_if_unchanged(&self, path: &str, expected: &Revision, value: Value) -> StoreResult<bool>;

    /// Optimistic read-apply-write, repeated until the write lands or the
    /// budget runs out. `update` may run several times and must be pure.
    async fn transaction(
        &self,
        path: &str,
        policy: RetryPolicy,
        update: &TransactionFn<'_>,
    ) -> StoreResult<Value> {
        let attempts = policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.read_versioned(path).await?;
            let next = update(current.value)?;
            if self.write_if_unchanged(path, &current.revision, next.clone()).await? {
                return Ok(next);
            }

            metrics::increment_counter!("herostats_txn_conflicts_total");
            tracing::debug!(path, attempt, "write conflict");
            if attempt < attempts && !policy.backoff.is_zero() {
                tokio::time::sleep(policy.backoff * attempt).await;
            }
        }
        Err(StoreError::RetriesExhausted {
            path: path.to_string(),
            attempts,
        })
    }
}

/// Path segments with empty pieces (leading, trailing, doubled `/`) dropped.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// `path` with redundant slashes removed.
pub(crate) fn normalize(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}
