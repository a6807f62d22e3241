//! Realtime store port
//!
//! The store is an external managed database that pushes the value at a
//! path whenever it changes. The dashboard only subscribes and issues
//! fire-and-forget writes; how values travel is the adapter's business.

use crate::error::{StoreError, StoreResult};
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc;

/// Port for the realtime store
pub trait RealtimeStore: Send + Sync {
    /// Subscribe to the value at `path`
    ///
    /// Adapters deliver the current value (possibly `null`) first, then
    /// every subsequent change. Dropping the subscription detaches it.
    fn subscribe(&self, path: &str) -> StoreResult<Subscription>;

    /// Read the value at `path` once (`null` when nothing is stored)
    fn read_once(&self, path: &str) -> StoreResult<Value>;

    /// Replace the value at `path`
    fn write(&self, path: &str, value: Value) -> StoreResult<()>;
}

impl<S: RealtimeStore + ?Sized> RealtimeStore for std::sync::Arc<S> {
    fn subscribe(&self, path: &str) -> StoreResult<Subscription> {
        (**self).subscribe(path)
    }

    fn read_once(&self, path: &str) -> StoreResult<Value> {
        (**self).read_once(path)
    }

    fn write(&self, path: &str, value: Value) -> StoreResult<()> {
        (**self).write(path, value)
    }
}

type Detach = Box<dyn FnOnce() + Send + Sync>;

/// Live listener on one store path
pub struct Subscription {
    path: String,
    receiver: mpsc::UnboundedReceiver<Value>,
    detach: Option<Detach>,
}

impl Subscription {
    /// Wrap a receiver; `detach` runs once when the subscription is dropped
    pub fn new<F>(path: &str, receiver: mpsc::UnboundedReceiver<Value>, detach: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            path: path.to_string(),
            receiver,
            detach: Some(Box::new(detach)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Next delivered value; `None` once the store side has gone away
    pub async fn recv(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }

    /// Non-blocking receive
    pub fn try_recv(&mut self) -> Option<Value> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Normalise a store path to `/a/b/c` form
///
/// Empty segments are collapsed; `/` is the root. Segments may not contain
/// the characters the hosted database forbids in keys.
pub fn normalize_path(path: &str) -> StoreResult<String> {
    let segments = path_segments(path)?;
    Ok(format!("/{}", segments.join("/")))
}

/// Split a store path into validated segments
pub fn path_segments(path: &str) -> StoreResult<Vec<&str>> {
    const FORBIDDEN: [char; 5] = ['.', '#', '$', '[', ']'];

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments
        .iter()
        .any(|s| s.chars().any(|c| FORBIDDEN.contains(&c) || c.is_control()))
    {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Join a child key onto a store path
pub fn child_path(parent: &str, child: &str) -> String {
    format!(
        "{}/{}",
        parent.trim_end_matches('/'),
        child.trim_start_matches('/')
    )
}
