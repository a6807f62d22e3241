//! In-process realtime store
//!
//! Keeps one JSON tree and pushes the value at a path to every listener
//! whose path is the written path, one of its ancestors or one of its
//! descendants. Listeners only see actual changes.

use parking_lot::Mutex;
use roomwatch_core::error::{StoreError, StoreResult};
use roomwatch_core::ports::{child_path, normalize_path, path_segments, RealtimeStore, Subscription};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

struct Listener {
    id: u64,
    segments: Vec<String>,
    last: Value,
    tx: mpsc::UnboundedSender<Value>,
}

#[derive(Default)]
struct Shared {
    root: Mutex<Value>,
    listeners: Mutex<Vec<Listener>>,
}

/// Realtime store held in memory
///
/// Cheap to clone; clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    next_id: Arc<AtomicU64>,
    push_counter: Arc<AtomicU64>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `root` as the whole tree
    pub fn with_root(root: Value) -> Self {
        let store = Self::new();
        *store.shared.root.lock() = prune(root);
        store
    }

    /// Store seeded from a JSON export of the database
    pub fn from_snapshot<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Snapshot(format!("{}: {}", path.display(), e)))?;
        let root: Value = serde_json::from_str(&text)
            .map_err(|e| StoreError::Snapshot(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded store snapshot from {}", path.display());
        Ok(Self::with_root(root))
    }

    /// Reject every write, like a database whose rules deny the client
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Append `value` under a fresh time-ordered key and return the key
    pub fn push(&self, path: &str, value: Value) -> StoreResult<String> {
        let key = self.next_push_key();
        self.write(&child_path(path, &key), value)?;
        Ok(key)
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Value {
        self.shared.root.lock().clone()
    }

    fn next_push_key(&self) -> String {
        push_key(self.push_counter.fetch_add(1, Ordering::SeqCst))
    }

    fn notify(&self, written: &[String]) {
        let root = self.shared.root.lock();
        let mut listeners = self.shared.listeners.lock();
        for listener in listeners.iter_mut() {
            if !related(&listener.segments, written) {
                continue;
            }
            let current = lookup(&root, &listener.segments);
            if current == listener.last {
                continue;
            }
            trace!("Delivering change to /{}", listener.segments.join("/"));
            listener.last = current.clone();
            let _ = listener.tx.send(current);
        }
    }
}

impl RealtimeStore for MemoryStore {
    fn subscribe(&self, path: &str) -> StoreResult<Subscription> {
        let normalized = normalize_path(path)?;
        let segments = owned_segments(&normalized)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();

        let current = lookup(&self.shared.root.lock(), &segments);
        let _ = tx.send(current.clone());
        self.shared.listeners.lock().push(Listener {
            id,
            segments,
            last: current,
            tx,
        });
        debug!("Listener {} attached at {}", id, normalized);

        let shared = Arc::downgrade(&self.shared);
        Ok(Subscription::new(&normalized, rx, move || {
            if let Some(shared) = shared.upgrade() {
                shared.listeners.lock().retain(|l| l.id != id);
            }
        }))
    }

    fn read_once(&self, path: &str) -> StoreResult<Value> {
        let segments = owned_segments(path)?;
        Ok(lookup(&self.shared.root.lock(), &segments))
    }

    fn write(&self, path: &str, value: Value) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                path: path.to_string(),
                reason: "permission denied".to_string(),
            });
        }
        let segments = owned_segments(path)?;
        {
            let mut root = self.shared.root.lock();
            let value = prune(value);
            if value.is_null() {
                remove(&mut root, &segments);
            } else {
                insert(&mut root, &segments, value);
            }
        }
        self.notify(&segments);
        Ok(())
    }
}

/// Time-ordered child key: `-`, 12 hex digits of milliseconds, 6 of sequence
pub fn push_key(seq: u64) -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    format!("-{:012x}{:06x}", millis, seq & 0xff_ffff)
}

fn owned_segments(path: &str) -> StoreResult<Vec<String>> {
    Ok(path_segments(path)?.into_iter().map(str::to_string).collect())
}

/// Listener at `a` cares about a write at `b` when one is a prefix of the other
fn related(a: &[String], b: &[String]) -> bool {
    let n = a.len().min(b.len());
    a[..n] == b[..n]
}

fn lookup(root: &Value, segments: &[String]) -> Value {
    let mut node = root;
    for segment in segments {
        match node.get(segment.as_str()) {
            Some(child) => node = child,
            None => return Value::Null,
        }
    }
    node.clone()
}

fn insert(root: &mut Value, segments: &[String], value: Value) {
    let mut node = root;
    for segment in segments {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
            _ => return,
        };
    }
    *node = value;
}

/// Remove the value at `segments` and any parents left empty
fn remove(node: &mut Value, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        *node = Value::Null;
        return true;
    };
    let Value::Object(map) = node else {
        return false;
    };
    if rest.is_empty() {
        map.remove(first.as_str());
    } else if let Some(child) = map.get_mut(first.as_str()) {
        if remove(child, rest) {
            map.remove(first.as_str());
        }
    }
    map.is_empty()
}

/// Drop nulls and empty objects, which the store never holds
fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !v.is_null())
                .collect();
            if pruned.is_empty() {
                Value::Null
            } else {
                Value::Object(pruned)
            }
        }
        other => other,
    }
}
