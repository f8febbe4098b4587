// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use async_trait::async_trait;
use herostats_node::store::{KeyedStore, MemoryStore, Revision, StoreError, StoreResult, Versioned};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

/// Memory store with injectable faults.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// `push` fails.
    pub fail_push: bool,
    /// `get` fails.
    pub fail_get: bool,
    /// Conditional writes to paths with this prefix always report a conflict.
    pub conflict_prefix: Option<String>,
    /// Conditional writes to exactly this path fail with a backend error.
    pub broken_path: Option<String>,
    pub conflicts: AtomicU32,
}

#[async_trait]
impl KeyedStore for FaultyStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        if self.fail_get {
            return Err(StoreError::Backend("get unavailable".into()));
        }
        self.inner.get(path).await
    }

    async fn push(&self, collection: &str, value: Value) -> StoreResult<String> {
        if self.fail_push {
            return Err(StoreError::Backend("push unavailable".into()));
        }
        self.inner.push(collection, value).await
    }

    async fn read_versioned(&self, path: &str) -> StoreResult<Versioned> {
        self.inner.read_versioned(path).await
    }

    async fn write_if_unchanged(&self, path: &str, expected: &Revision, value: Value) -> StoreResult<bool> {
        if self.broken_path.as_deref() == Some(path) {
            return Err(StoreError::Backend(format!("write to {} refused", path)));
        }
        if let Some(prefix) = &self.conflict_prefix {
            if path.starts_with(prefix.as_str()) {
                self.conflicts.fetch_add(1, Ordering::SeqCst);
                return Ok(false);
            }
        }
        self.inner.write_if_unchanged(path, expected, value).await
    }
}
