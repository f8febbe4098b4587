// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use super::{normalize, segments, KeyedStore, Revision, StoreError, StoreResult, Versioned};

const HISTORY_PREFIX: &str = "matchHistory/";

struct Entry {
    value: Value,
    version: u64,
}

/// In-process store. Leaf values are kept under their full path; a read of
/// a prefix assembles the subtree. Revisions are per-path write counters,
/// `0` meaning never written.
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Entry>>,
    next_push: AtomicU64,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            next_push: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Successful writes and pushes since creation or the last restore.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of leaf paths held.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.data.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// JSON object of every leaf path to its value.
    pub fn snapshot(&self) -> StoreResult<Vec<u8>> {
        let guard = self.data.read().map_err(|_| StoreError::Poisoned)?;
        let flat: BTreeMap<&str, &Value> = guard.iter().map(|(k, e)| (k.as_str(), &e.value)).collect();
        Ok(serde_json::to_vec(&flat)?)
    }

    /// Replaces the whole content with a [`snapshot`](Self::snapshot).
    pub fn restore(&self, data: &[u8]) -> StoreResult<()> {
        let flat: BTreeMap<String, Value> = serde_json::from_slice(data)?;
        let next_push = flat
            .keys()
            .filter_map(|k| normalize(k).strip_prefix(HISTORY_PREFIX).map(str::to_string))
            .filter_map(|child| u64::from_str_radix(&child, 16).ok())
            .max()
            .map_or(0, |max| max + 1);

        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        *guard = flat
            .into_iter()
            .map(|(k, value)| (normalize(&k), Entry { value, version: 1 }))
            .collect();
        self.next_push.store(next_push, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
        Ok(())
    }

    /// Writes the snapshot next to `path` and renames it into place.
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<usize> {
        let bytes = self.snapshot()?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, &bytes)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(bytes.len())
    }

    pub fn load_snapshot(&self, path: &Path) -> StoreResult<()> {
        let bytes = std::fs::read(path)?;
        self.restore(&bytes)
    }

    fn read_path(&self, path: &str) -> StoreResult<Option<Value>> {
        let path = normalize(path);
        let guard = self.data.read().map_err(|_| StoreError::Poisoned)?;
        if let Some(entry) = guard.get(&path) {
            return Ok(Some(entry.value.clone()));
        }

        let prefix = if path.is_empty() { String::new() } else { format!("{}/", path) };
        let mut tree = Map::new();
        for (key, entry) in guard.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else { break };
            let parts: Vec<&str> = segments(rest).collect();
            insert_nested(&mut tree, &parts, entry.value.clone());
        }
        Ok(if tree.is_empty() { None } else { Some(Value::Object(tree)) })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_nested(tree: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            tree.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let child = tree
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_nested(child, rest, value);
            }
        }
    }
}

#[async_trait]
impl KeyedStore for MemoryStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        self.read_path(path)
    }

    async fn push(&self, collection: &str, value: Value) -> StoreResult<String> {
        let id = self.next_push.fetch_add(1, Ordering::SeqCst);
        let key = format!("{:016x}", id);
        let path = format!("{}/{}", normalize(collection), key);

        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(path, Entry { value, version: 1 });
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(key)
    }

    async fn read_versioned(&self, path: &str) -> StoreResult<Versioned> {
        let path = normalize(path);
        let guard = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(match guard.get(&path) {
            Some(entry) => Versioned {
                value: Some(entry.value.clone()),
                revision: Revision(entry.version.to_string()),
            },
            None => Versioned {
                value: None,
                revision: Revision("0".to_string()),
            },
        })
    }

    async fn write_if_unchanged(&self, path: &str, expected: &Revision, value: Value) -> StoreResult<bool> {
        let expected: u64 = expected
            .0
            .parse()
            .map_err(|_| StoreError::InvalidRevision(expected.0.clone()))?;
        let path = normalize(path);

        let mut guard = self.data.write().map_err(|_| StoreError::Poisoned)?;
        let current = guard.get(&path).map_or(0, |e| e.version);
        if current != expected {
            return Ok(false);
        }
        guard.insert(path, Entry { value, version: current + 1 });
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}
