use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{NotificationKind, NotificationScheduler, NotificationTiming, Phase};
use crate::page::Page;

/// Where notifications are delivered.
pub trait Notifier: Send {
    fn notify(&mut self, kind: NotificationKind, message: &str, now: DateTime<Utc>);

    /// Apply timer transitions due at `now`.
    fn tick(&mut self, now: DateTime<Utc>);

    fn next_deadline(&self) -> Option<DateTime<Utc>>;
}

/// Pick the notifier for a page. Decided once, at startup.
pub fn select_notifier(page: Arc<dyn Page>, timing: NotificationTiming) -> Box<dyn Notifier> {
    if page.has_notification_container() {
        Box::new(ContainerNotifier::new(page, timing))
    } else {
        debug!("No notification container, falling back to alerts");
        Box::new(AlertNotifier::new(page))
    }
}

/// Renders notifications into the page's container and expires them.
pub struct ContainerNotifier {
    page: Arc<dyn Page>,
    scheduler: NotificationScheduler,
}

impl ContainerNotifier {
    pub fn new(page: Arc<dyn Page>, timing: NotificationTiming) -> Self {
        Self {
            page,
            scheduler: NotificationScheduler::new(timing),
        }
    }

    pub fn scheduler(&self) -> &NotificationScheduler {
        &self.scheduler
    }
}

impl Notifier for ContainerNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str, now: DateTime<Utc>) {
        let notification = self.scheduler.insert(kind, message, now);
        self.page.show_notification(&notification);
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        for transition in self.scheduler.advance(now) {
            match transition.phase() {
                Phase::Removed => self.page.remove_notification(transition.id()),
                _ => self.page.show_notification(&transition.notification),
            }
        }
    }

    fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.scheduler.next_deadline()
    }
}

/// Blocking alert fallback. Nothing to expire.
pub struct AlertNotifier {
    page: Arc<dyn Page>,
}

impl AlertNotifier {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }
}

impl Notifier for AlertNotifier {
    fn notify(&mut self, _kind: NotificationKind, message: &str, _now: DateTime<Utc>) {
        self.page.alert(message);
    }

    fn tick(&mut self, _now: DateTime<Utc>) {}

    fn next_deadline(&self) -> Option<DateTime<Utc>> {
        None
    }
}
