//! Front-end state that the core knows nothing about.

use std::time::{Duration, Instant};

use quotawatch_core::api::{CoreEvent, NotifyLevel};

/// How long a notification stays on the status bar
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// A transient message shown on the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub shown_at: Instant,
}

/// UI-only state of the watch screen
#[derive(Debug)]
pub struct ViewState {
    pub running: bool,
    pub show_details: bool,
    pub notification: Option<Notification>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            running: true,
            show_details: false,
            notification: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    pub fn notify(&mut self, level: NotifyLevel, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            level,
            message: message.into(),
            shown_at: now,
        });
    }

    /// Drop the notification once it has been visible long enough.
    /// Errors stay until replaced.
    pub fn expire_notification(&mut self, now: Instant) {
        let expired = self.notification.as_ref().is_some_and(|n| {
            n.level == NotifyLevel::Info && now.duration_since(n.shown_at) >= NOTIFICATION_TTL
        });
        if expired {
            self.notification = None;
        }
    }

    /// Fold a core event into the view
    pub fn apply_event(&mut self, event: CoreEvent, now: Instant) {
        match event {
            CoreEvent::Notify { level, message } => self.notify(level, message, now),
            CoreEvent::ShowDetails => self.show_details = true,
            // Indicator and status are read from the core on each frame
            CoreEvent::IndicatorUpdated(_) | CoreEvent::StatusUpdated => {}
        }
    }
}
