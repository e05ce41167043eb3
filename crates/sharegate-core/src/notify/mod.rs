//! Transient user-facing notifications.
//!
//! A notification is shown, kept visible for a display period, faded out,
//! then removed. Each one is timed independently by a single
//! [`NotificationScheduler`]. Delivery goes through a [`Notifier`]: the page
//! container when one exists, a blocking alert otherwise.

pub mod notifier;
pub mod scheduler;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use notifier::{select_notifier, AlertNotifier, ContainerNotifier, Notifier};
pub use scheduler::{NotificationScheduler, Transition};

/// How long a notification stays fully visible
pub const DEFAULT_DISPLAY_MS: i64 = 5000;

/// Length of the fade-out before removal
pub const DEFAULT_FADE_MS: i64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl NotificationId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    /// Suffix of the `alert-*` style class.
    pub fn css_suffix(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "danger",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

/// Lifecycle phase. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Created,
    Visible,
    FadingOut,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            created_at,
            phase: Phase::Created,
        }
    }

    /// Style classes for the rendered alert element.
    pub fn css_class(&self) -> String {
        let mut class = format!("alert alert-{} alert-dismissible fade", self.kind.css_suffix());
        if self.phase == Phase::Visible {
            class.push_str(" show");
        }
        class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            display: Duration::milliseconds(DEFAULT_DISPLAY_MS),
            fade: Duration::milliseconds(DEFAULT_FADE_MS),
        }
    }
}
