use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Notification, NotificationId, NotificationKind, NotificationTiming, Phase};

/// A phase change produced by [`NotificationScheduler::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The notification after the change.
    pub notification: Notification,
}

impl Transition {
    pub fn id(&self) -> NotificationId {
        self.notification.id
    }

    pub fn phase(&self) -> Phase {
        self.notification.phase
    }
}

#[derive(Debug)]
struct Entry {
    notification: Notification,
    fade_at: DateTime<Utc>,
    remove_at: DateTime<Utc>,
}

/// Drives every live notification through
/// `Created -> Visible -> FadingOut -> Removed`.
///
/// Deadlines are fixed at insertion: fade-out at `created + display`,
/// removal at `created + display + fade`, whatever the tick cadence.
#[derive(Debug)]
pub struct NotificationScheduler {
    timing: NotificationTiming,
    next_id: u64,
    entries: Vec<Entry>,
}

impl NotificationScheduler {
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            timing,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub fn timing(&self) -> NotificationTiming {
        self.timing
    }

    /// Create a notification and make it visible immediately.
    pub fn insert(
        &mut self,
        kind: NotificationKind,
        message: &str,
        now: DateTime<Utc>,
    ) -> Notification {
        let id = NotificationId::new(self.next_id);
        self.next_id += 1;

        let mut notification = Notification::new(id, kind, message, now);
        notification.phase = Phase::Visible;

        // Deadlines past the end of representable time never fire
        let fade_at = now
            .checked_add_signed(self.timing.display)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let remove_at = fade_at
            .checked_add_signed(self.timing.fade)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.push(Entry {
            notification: notification.clone(),
            fade_at,
            remove_at,
        });
        debug!(%id, ?kind, "Notification shown");
        notification
    }

    /// Apply every transition due at `now`, in insertion order.
    ///
    /// A notification may pass through both `FadingOut` and `Removed` in a
    /// single call when `now` is far enough ahead. Removed notifications are
    /// dropped from the scheduler.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<Transition> {
        let mut transitions = Vec::new();

        for entry in &mut self.entries {
            if entry.notification.phase == Phase::Visible && now >= entry.fade_at {
                entry.notification.phase = Phase::FadingOut;
                transitions.push(Transition {
                    notification: entry.notification.clone(),
                });
            }
            if entry.notification.phase == Phase::FadingOut && now >= entry.remove_at {
                entry.notification.phase = Phase::Removed;
                transitions.push(Transition {
                    notification: entry.notification.clone(),
                });
                debug!(id = %entry.notification.id, "Notification removed");
            }
        }

        self.entries
            .retain(|entry| entry.notification.phase != Phase::Removed);
        transitions
    }

    /// The earliest pending transition, if any notification is live.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .map(|entry| match entry.notification.phase {
                Phase::FadingOut => entry.remove_at,
                _ => entry.fade_at,
            })
            .min()
    }

    /// Live notifications, oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|entry| &entry.notification)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new(NotificationTiming::default())
    }
}
