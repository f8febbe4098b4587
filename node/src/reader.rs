// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Read-only access to one category at a time.
//!
//! Each record is read as the store currently holds it; under concurrent
//! submissions two records in the same result may reflect different moments.

use herostats_kernel::{AggregateRecord, Category, MatchResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::store::{KeyedStore, StoreError, StoreResult};

#[derive(Clone)]
pub struct StatsReader {
    store: Arc<dyn KeyedStore>,
}

impl StatsReader {
    pub fn new(store: Arc<dyn KeyedStore>) -> Self {
        Self { store }
    }

    /// Child key to raw value. An untouched category is an empty map.
    pub async fn read(&self, category: Category) -> StoreResult<BTreeMap<String, Value>> {
        match self.store.get(category.prefix()).await? {
            None | Some(Value::Null) => Ok(BTreeMap::new()),
            Some(Value::Object(children)) => Ok(children.into_iter().collect()),
            Some(_) => Err(StoreError::UnexpectedShape(category.prefix().to_string())),
        }
    }

    /// Counter records keyed by subject, e.g. `Tracer-vs-Widowmaker`.
    pub async fn read_aggregates(&self, category: Category) -> StoreResult<BTreeMap<String, AggregateRecord>> {
        if !category.is_counter() {
            return Err(StoreError::UnexpectedShape(category.prefix().to_string()));
        }
        self.read_typed(category).await
    }

    /// Raw matches keyed by their history key, oldest first.
    pub async fn read_history(&self) -> StoreResult<BTreeMap<String, MatchResult>> {
        self.read_typed(Category::MatchHistory).await
    }

    async fn read_typed<T: DeserializeOwned>(&self, category: Category) -> StoreResult<BTreeMap<String, T>> {
        self.read(category)
            .await?
            .into_iter()
            .map(|(key, value)| -> StoreResult<(String, T)> { Ok((key, serde_json::from_value(value)?)) })
            .collect()
    }
}
