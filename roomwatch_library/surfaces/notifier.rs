//! Notifications written to the log

use roomwatch_core::ports::{NotificationSurface, Permission};
use tracing::info;

/// Notification surface that reports through `tracing`
///
/// Starts with the given permission. A request while the permission is
/// still `Prompt` resolves it to the configured answer.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    permission: Permission,
    prompt_answer: Permission,
    sent: usize,
}

impl LogNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            prompt_answer: Permission::Granted,
            sent: 0,
        }
    }

    pub fn with_prompt_answer(mut self, answer: Permission) -> Self {
        self.prompt_answer = answer;
        self
    }

    /// Notifications actually shown
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(Permission::Prompt)
    }
}

impl NotificationSurface for LogNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Prompt {
            self.permission = self.prompt_answer;
            info!("Notification permission {}", self.permission);
        }
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) {
        if self.permission != Permission::Granted {
            return;
        }
        self.sent += 1;
        info!(target: "roomwatch::notify", "{}: {}", title, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_resolves_once() {
        let mut notifier = LogNotifier::default().with_prompt_answer(Permission::Denied);
        assert_eq!(notifier.request_permission(), Permission::Denied);
        notifier.notify("Hostel Monitor", "Light ON detected");
        assert_eq!(notifier.sent(), 0);
    }

    #[test]
    fn test_granted_sends() {
        let mut notifier = LogNotifier::new(Permission::Granted);
        notifier.notify("Hostel Monitor", "Light ON detected");
        assert_eq!(notifier.sent(), 1);
    }
}
