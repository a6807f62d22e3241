//! Schema adapters
//!
//! Deployments store the same readings in two shapes: a scalar leaf that is
//! overwritten on every sample, or a list of pushed child records. The
//! reactor is written once against `SchemaAdapter`; the adapter turns
//! whichever shape the store holds into "latest value" and "new history
//! samples" streams.

use super::store::{RealtimeStore, Subscription};
use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Which storage shape a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaLayout {
    /// `/sensors/temperature = 24.5`
    #[default]
    Scalar,
    /// `/sensors/temperature/<push-id> = { value: 24.5, ... }`
    Records,
}

impl fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLayout::Scalar => f.write_str("scalar"),
            SchemaLayout::Records => f.write_str("records"),
        }
    }
}

/// Port the reactor consumes instead of raw store paths
pub trait SchemaAdapter: Send + Sync {
    /// Stream of the latest logical value at `path`
    fn subscribe_latest(&self, path: &str) -> StoreResult<LatestStream>;

    /// Stream of batches of samples not delivered before, each at most `limit` long
    fn subscribe_history(&self, path: &str, limit: usize) -> StoreResult<HistoryStream>;

    /// Fire-and-forget write through to the store
    fn write(&self, path: &str, value: Value) -> StoreResult<()>;

    fn layout(&self) -> SchemaLayout;
}

/// Latest-value stream produced by a schema adapter
pub struct LatestStream {
    subscription: Subscription,
    extract: Box<dyn FnMut(Value) -> Value + Send>,
}

impl LatestStream {
    pub fn new<F>(subscription: Subscription, extract: F) -> Self
    where
        F: FnMut(Value) -> Value + Send + 'static,
    {
        Self {
            subscription,
            extract: Box::new(extract),
        }
    }

    pub fn path(&self) -> &str {
        self.subscription.path()
    }

    pub async fn recv(&mut self) -> Option<Value> {
        let raw = self.subscription.recv().await?;
        Some((self.extract)(raw))
    }
}

/// History-batch stream produced by a schema adapter
pub struct HistoryStream {
    subscription: Subscription,
    extract: Box<dyn FnMut(Value) -> Vec<Value> + Send>,
}

impl HistoryStream {
    pub fn new<F>(subscription: Subscription, extract: F) -> Self
    where
        F: FnMut(Value) -> Vec<Value> + Send + 'static,
    {
        Self {
            subscription,
            extract: Box::new(extract),
        }
    }

    pub fn path(&self) -> &str {
        self.subscription.path()
    }

    pub async fn recv(&mut self) -> Option<Vec<Value>> {
        let raw = self.subscription.recv().await?;
        Some((self.extract)(raw))
    }
}

/// Adapter for stores that keep each reading as a scalar leaf
#[derive(Debug, Clone)]
pub struct ScalarLeafAdapter<S> {
    store: S,
}

impl<S: RealtimeStore> ScalarLeafAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RealtimeStore> SchemaAdapter for ScalarLeafAdapter<S> {
    fn subscribe_latest(&self, path: &str) -> StoreResult<LatestStream> {
        Ok(LatestStream::new(self.store.subscribe(path)?, |v| v))
    }

    fn subscribe_history(&self, path: &str, _limit: usize) -> StoreResult<HistoryStream> {
        // Each change to the leaf is one new sample
        Ok(HistoryStream::new(self.store.subscribe(path)?, |v| {
            if v.is_null() {
                Vec::new()
            } else {
                vec![v]
            }
        }))
    }

    fn write(&self, path: &str, value: Value) -> StoreResult<()> {
        self.store.write(path, value)
    }

    fn layout(&self) -> SchemaLayout {
        SchemaLayout::Scalar
    }
}

/// Adapter for stores that push one child record per reading
#[derive(Debug, Clone)]
pub struct PushedRecordAdapter<S> {
    store: S,
    value_field: String,
}

impl<S: RealtimeStore> PushedRecordAdapter<S> {
    pub fn new(store: S, value_field: &str) -> Self {
        Self {
            store,
            value_field: value_field.to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RealtimeStore> SchemaAdapter for PushedRecordAdapter<S> {
    fn subscribe_latest(&self, path: &str) -> StoreResult<LatestStream> {
        let field = self.value_field.clone();
        Ok(LatestStream::new(self.store.subscribe(path)?, move |v| {
            latest_record(v, &field)
        }))
    }

    fn subscribe_history(&self, path: &str, limit: usize) -> StoreResult<HistoryStream> {
        let field = self.value_field.clone();
        let mut last_key: Option<String> = None;
        Ok(HistoryStream::new(self.store.subscribe(path)?, move |v| {
            let Some(records) = record_list(&v) else {
                return Vec::new();
            };
            let mut fresh: Vec<(&String, &Value)> = records
                .iter()
                .filter(|(k, _)| last_key.as_ref().map_or(true, |last| *k > last))
                .collect();
            fresh.sort_by(|a, b| a.0.cmp(b.0));
            if let Some((newest, _)) = fresh.last() {
                last_key = Some((*newest).clone());
            }
            let skip = fresh.len().saturating_sub(limit);
            fresh
                .into_iter()
                .skip(skip)
                .map(|(_, record)| unwrap_record(record, &field))
                .filter(|v| !v.is_null())
                .collect()
        }))
    }

    fn write(&self, path: &str, value: Value) -> StoreResult<()> {
        self.store.write(path, value)
    }

    fn layout(&self) -> SchemaLayout {
        SchemaLayout::Records
    }
}

/// Children of `value` when it looks like a list of pushed records
///
/// A record list is an object whose children are all objects, or whose keys
/// are all push ids (leading `-`). Anything else, such as the alert object
/// with string fields, is a plain value.
fn record_list(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    if map.is_empty() {
        return None;
    }
    let all_objects = map.values().all(Value::is_object);
    let all_push_ids = map.keys().all(|k| k.starts_with('-'));
    (all_objects || all_push_ids).then_some(map)
}

fn unwrap_record(record: &Value, field: &str) -> Value {
    match record.get(field) {
        Some(inner) if record.is_object() => inner.clone(),
        _ => record.clone(),
    }
}

/// Latest logical value under a record list, or the value itself
pub fn latest_record(value: Value, field: &str) -> Value {
    match record_list(&value) {
        Some(records) => records
            .iter()
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(_, record)| unwrap_record(record, field))
            .unwrap_or(Value::Null),
        None => value,
    }
}
