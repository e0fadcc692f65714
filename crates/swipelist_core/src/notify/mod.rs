//! Transient user notifications (snackbars).
//!
//! # Responsibility
//! - Define the request/result contract between list logic and the
//!   notification presentation layer.
//! - Provide a headless snackbar host that the UI shell renders.
//!
//! # Invariants
//! - Every `show` call resolves exactly once: action, dismissal or timeout.
//! - At most one notification is visible per host.

pub mod snackbar_host;

use async_trait::async_trait;
use std::time::Duration;

/// How long a notification stays visible without user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDuration {
    Short,
    Long,
    /// Visible until resolved by the user or force-dismissed.
    Indefinite,
}

/// Message plus optional single action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub message: String,
    pub action_label: Option<String>,
    pub duration: NotificationDuration,
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>, duration: NotificationDuration) -> Self {
        Self {
            message: message.into(),
            action_label: None,
            duration,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }
}

/// Outcome reported back to the code that requested the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationResult {
    /// Timed out, swiped away, or replaced by a newer notification.
    Dismissed,
    /// User pressed the action button.
    ActionPerformed,
}

/// Presentation service consumed by `ListController`.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Shows `request` and suspends until it resolves.
    async fn show(&self, request: NotificationRequest) -> NotificationResult;

    /// Force-dismisses the visible notification, if any.
    ///
    /// Returns whether a notification was dismissed.
    fn dismiss_current(&self) -> bool;
}

/// Timeouts applied to `Short` and `Long` durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimeouts {
    pub short: Duration,
    pub long: Duration,
}

impl NotificationTimeouts {
    pub fn resolve(&self, duration: NotificationDuration) -> Option<Duration> {
        match duration {
            NotificationDuration::Short => Some(self.short),
            NotificationDuration::Long => Some(self.long),
            NotificationDuration::Indefinite => None,
        }
    }
}
