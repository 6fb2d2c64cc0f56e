//! Transient, dismissible notifications.
//!
//! Collaborator failures end up here — never in the working tree, which
//! stays editable and unchanged while the notice is shown.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Notification sink supplied by the host
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Buffering sink for tests and headless hosts
#[derive(Debug, Default)]
pub struct BufferedNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().expect("notifier poisoned"))
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .expect("notifier poisoned")
            .last()
            .cloned()
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notifier poisoned").push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_notifier_collects_in_order() {
        let notifier = BufferedNotifier::new();
        notifier.notify(Notice::success("saved"));
        notifier.notify(Notice::error("upload failed"));

        let notices = notifier.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].severity, Severity::Success);
        assert_eq!(notices[1].severity, Severity::Error);
        assert!(notifier.drain().is_empty());
    }
}
