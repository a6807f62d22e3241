//! System notification port
//!
//! Best effort: without permission a notification is simply not shown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification permission as reported by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; requesting may prompt the user
    #[default]
    Prompt,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Granted => f.write_str("granted"),
            Permission::Denied => f.write_str("denied"),
            Permission::Prompt => f.write_str("prompt"),
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            "prompt" | "default" => Ok(Permission::Prompt),
            other => Err(format!("unknown permission '{}'", other)),
        }
    }
}

/// Port for native system notifications
pub trait NotificationSurface: Send {
    fn permission(&self) -> Permission;

    /// Ask for permission; returns the resulting state
    fn request_permission(&mut self) -> Permission;

    /// Show a notification; a no-op unless permission is granted
    fn notify(&mut self, title: &str, body: &str);
}

impl<N: NotificationSurface + ?Sized> NotificationSurface for Box<N> {
    fn permission(&self) -> Permission {
        (**self).permission()
    }

    fn request_permission(&mut self) -> Permission {
        (**self).request_permission()
    }

    fn notify(&mut self, title: &str, body: &str) {
        (**self).notify(title, body)
    }
}
