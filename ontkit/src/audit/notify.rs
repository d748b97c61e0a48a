//! Notification sink for user-facing messages.

use log::{info, warn};

/// Trait for surfacing messages to the technician.
///
/// Calls are fire-and-forget; nothing is returned to the caller.
pub trait Notifier {
    /// Report a failed action.
    fn show_error(&mut self, message: &str);

    /// Report a successful action, optionally with a message.
    fn show_success(&mut self, message: Option<&str>);

    /// Report neutral information.
    fn show_info(&mut self, message: &str);
}

/// Notifier that writes to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_error(&mut self, message: &str) {
        warn!("{}", message);
    }

    fn show_success(&mut self, message: Option<&str>) {
        info!("{}", message.unwrap_or("done"));
    }

    fn show_info(&mut self, message: &str) {
        info!("{}", message);
    }
}

/// A notification kept by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Success(Option<String>),
    Info(String),
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Error messages, oldest first.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.notifications.iter().filter_map(|n| match n {
            Notification::Error(message) => Some(message.as_str()),
            _ => None,
        })
    }

    /// Drain the recorded notifications.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&mut self, message: &str) {
        self.notifications.push(Notification::Error(message.to_string()));
    }

    fn show_success(&mut self, message: Option<&str>) {
        self.notifications
            .push(Notification::Success(message.map(str::to_string)));
    }

    fn show_info(&mut self, message: &str) {
        self.notifications.push(Notification::Info(message.to_string()));
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn show_error(&mut self, message: &str) {
        (**self).show_error(message);
    }

    fn show_success(&mut self, message: Option<&str>) {
        (**self).show_success(message);
    }

    fn show_info(&mut self, message: &str) {
        (**self).show_info(message);
    }
}
