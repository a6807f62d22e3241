//! Ports - traits at the boundary between the reactor and the outside
//!
//! - **RealtimeStore**: push-based value subscriptions and writes
//! - **SchemaAdapter**: maps a store layout onto latest/history streams
//! - **IdentityProvider**: sign-in, account creation, session changes
//! - **DisplaySurface**: text regions, log list, transient banner
//! - **NotificationSurface**: native notifications and their permission
//! - **AlarmSound**: the audible alarm tone

pub mod audio;
pub mod display;
pub mod identity;
pub mod notify;
pub mod schema;
pub mod store;

pub use audio::{AlarmSound, Tone, Waveform};
pub use display::{DisplaySurface, Emphasis, Region};
pub use identity::{is_valid_email, IdentityProvider, Session, MIN_PASSWORD_LEN};
pub use notify::{NotificationSurface, Permission};
pub use schema::{
    HistoryStream, LatestStream, PushedRecordAdapter, ScalarLeafAdapter, SchemaAdapter,
    SchemaLayout,
};
pub use store::{child_path, normalize_path, path_segments, RealtimeStore, Subscription};
