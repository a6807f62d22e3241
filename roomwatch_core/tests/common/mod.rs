// Shared fakes for reactor integration tests
#![allow(dead_code)]

use parking_lot::Mutex;
use roomwatch_core::error::{AudioError, AuthError, AuthResult, DisplayError, StoreResult};
use roomwatch_core::ports::{
    AlarmSound, DisplaySurface, Emphasis, IdentityProvider, NotificationSurface, Permission,
    RealtimeStore, Region, Session, Subscription, Tone,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// In-test store: exact-path listeners only
#[derive(Default)]
pub struct FakeStore {
    values: Mutex<HashMap<String, Value>>,
    listeners: Arc<Mutex<HashMap<String, Vec<(usize, mpsc::UnboundedSender<Value>)>>>>,
    next_id: AtomicUsize,
    subscribed: AtomicUsize,
    pub writes: Mutex<Vec<(String, Value)>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Change a value from the sensor side
    pub fn set(&self, path: &str, value: Value) {
        self.values.lock().insert(path.to_string(), value.clone());
        if let Some(listeners) = self.listeners.lock().get(path) {
            for (_, tx) in listeners {
                let _ = tx.send(value.clone());
            }
        }
    }

    /// Subscriptions ever opened
    pub fn subscribe_count(&self) -> usize {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// Subscriptions still attached
    pub fn active_listeners(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }
}

impl RealtimeStore for FakeStore {
    fn subscribe(&self, path: &str) -> StoreResult<Subscription> {
        self.subscribed.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(self.read_once(path)?);
        self.listeners
            .lock()
            .entry(path.to_string())
            .or_default()
            .push((id, tx));

        let listeners = self.listeners.clone();
        let key = path.to_string();
        Ok(Subscription::new(path, rx, move || {
            if let Some(list) = listeners.lock().get_mut(&key) {
                list.retain(|(other, _)| *other != id);
            }
        }))
    }

    fn read_once(&self, path: &str) -> StoreResult<Value> {
        Ok(self.values.lock().get(path).cloned().unwrap_or(Value::Null))
    }

    fn write(&self, path: &str, value: Value) -> StoreResult<()> {
        self.writes.lock().push((path.to_string(), value));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Painted {
    Text(Region, String),
    Emphasis(Region, Emphasis),
    Log(Vec<String>),
    Banner(String),
    HideBanner,
}

/// Display that records every update
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pub painted: Arc<Mutex<Vec<Painted>>>,
    pub missing: Vec<Region>,
}

impl RecordingDisplay {
    pub fn texts(&self, region: Region) -> Vec<String> {
        self.painted
            .lock()
            .iter()
            .filter_map(|p| match p {
                Painted::Text(r, text) if *r == region => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Banner shows (`Some`) and hides (`None`) in order
    pub fn banners(&self) -> Vec<Option<String>> {
        self.painted
            .lock()
            .iter()
            .filter_map(|p| match p {
                Painted::Banner(text) => Some(Some(text.clone())),
                Painted::HideBanner => Some(None),
                _ => None,
            })
            .collect()
    }

    pub fn emphasis(&self) -> Vec<Emphasis> {
        self.painted
            .lock()
            .iter()
            .filter_map(|p| match p {
                Painted::Emphasis(_, e) => Some(*e),
                _ => None,
            })
            .collect()
    }

    pub fn last_log(&self) -> Option<Vec<String>> {
        self.painted.lock().iter().rev().find_map(|p| match p {
            Painted::Log(lines) => Some(lines.clone()),
            _ => None,
        })
    }

    fn record(&self, region: Region, painted: Painted) -> Result<(), DisplayError> {
        if self.missing.contains(&region) {
            return Err(DisplayError::MissingRegion(region));
        }
        self.painted.lock().push(painted);
        Ok(())
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        self.record(region, Painted::Text(region, text.to_string()))
    }

    fn set_emphasis(&mut self, region: Region, emphasis: Emphasis) -> Result<(), DisplayError> {
        self.record(region, Painted::Emphasis(region, emphasis))
    }

    fn render_log(&mut self, lines: &[String]) -> Result<(), DisplayError> {
        self.record(Region::Log, Painted::Log(lines.to_vec()))
    }

    fn show_banner(&mut self, text: &str) -> Result<(), DisplayError> {
        self.record(Region::Banner, Painted::Banner(text.to_string()))
    }

    fn hide_banner(&mut self) -> Result<(), DisplayError> {
        self.record(Region::Banner, Painted::HideBanner)
    }
}

/// Notifier with a fixed permission answer
#[derive(Clone)]
pub struct RecordingNotifier {
    pub permission: Permission,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub requests: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            sent: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl NotificationSurface for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) {
        self.sent.lock().push((title.to_string(), body.to_string()));
    }
}

/// Sound port that counts plays and can refuse them
#[derive(Clone, Default)]
pub struct CountingSound {
    pub plays: Arc<AtomicUsize>,
    pub restricted: bool,
}

impl AlarmSound for CountingSound {
    fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.restricted {
            Err(AudioError::Restricted("no user gesture yet".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Identity provider with one hard-wired account
pub struct FakeIdentity {
    session: watch::Sender<Option<Session>>,
}

impl FakeIdentity {
    pub fn signed_in() -> Arc<Self> {
        Arc::new(Self {
            session: watch::channel(Some(Session::new("uid-1", "warden@hostel.test"))).0,
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            session: watch::channel(None).0,
        })
    }
}

impl IdentityProvider for FakeIdentity {
    fn sign_in(&self, email: &str, _password: &str) -> AuthResult<Session> {
        let session = Session::new("uid-1", email);
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    fn create_account(&self, _email: &str, _password: &str) -> AuthResult<Session> {
        Err(AuthError::EmailAlreadyInUse)
    }

    fn sign_out(&self) -> AuthResult<()> {
        self.session.send_replace(None);
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
