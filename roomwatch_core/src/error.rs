//! Error types for ROOMWATCH
//!
//! Each port carries its own error enum so adapters can report failures
//! precisely; `RoomwatchError` wraps them for callers that only need to
//! propagate.

use crate::ports::display::Region;
use thiserror::Error;

/// Errors raised by a realtime store adapter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Invalid store path '{0}'")]
    InvalidPath(String),

    #[error("Cannot write below non-object value at '{0}'")]
    NotAnObject(String),

    #[error("Store connection closed")]
    Closed,

    #[error("Store write to '{path}' rejected: {reason}")]
    WriteRejected { path: String, reason: String },

    #[error("Failed to load store snapshot: {0}")]
    Snapshot(String),
}

/// Errors raised by the identity provider
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("The email address is badly formatted")]
    InvalidEmail,

    #[error("Password should be at least {0} characters")]
    WeakPassword(usize),

    #[error("The email address is already in use by another account")]
    EmailAlreadyInUse,

    #[error("There is no user record corresponding to this identifier")]
    UserNotFound,

    #[error("The password is invalid")]
    WrongPassword,

    #[error("Identity storage failure: {0}")]
    Storage(String),
}

/// Errors raised by a display surface
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Display region '{0}' not found")]
    MissingRegion(Region),

    #[error("Display surface unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by an alarm sound adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio playback restricted: {0}")]
    Restricted(String),

    #[error("No audio output available")]
    Unavailable,
}

/// Main error type for ROOMWATCH operations
#[derive(Debug, Error)]
pub enum RoomwatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("No authenticated session")]
    Unauthenticated,

    #[error("Reactor is not running")]
    ReactorStopped,
}

impl RoomwatchError {
    /// Shorthand for a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        RoomwatchError::Config(msg.into())
    }
}

impl From<toml::de::Error> for RoomwatchError {
    fn from(err: toml::de::Error) -> Self {
        RoomwatchError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<toml::ser::Error> for RoomwatchError {
    fn from(err: toml::ser::Error) -> Self {
        RoomwatchError::Config(format!("Failed to serialize TOML: {}", err))
    }
}

impl From<serde_yaml::Error> for RoomwatchError {
    fn from(err: serde_yaml::Error) -> Self {
        RoomwatchError::Config(format!("Failed to parse YAML: {}", err))
    }
}

/// Result alias used across ROOMWATCH
pub type RoomwatchResult<T> = Result<T, RoomwatchError>;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result alias for identity operations
pub type AuthResult<T> = Result<T, AuthError>;
