//! The page surface the session bridge drives.
//!
//! A [`Page`] stands in for the rendered document: element groups whose
//! visibility is toggled, an optional logout trigger, an optional
//! notification container, a blocking alert and navigation. Missing
//! elements never raise; the corresponding operation does nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::notify::{Notification, NotificationId};
use crate::visibility::Group;

pub trait Page: Send + Sync {
    /// Show or hide every element tagged with `group`.
    fn set_group_visible(&self, group: Group, visible: bool);

    fn has_logout_trigger(&self) -> bool;

    fn has_notification_container(&self) -> bool;

    /// Insert a notification, or re-render it if already present.
    fn show_notification(&self, notification: &Notification);

    fn remove_notification(&self, id: NotificationId);

    /// Blocking alert box.
    fn alert(&self, message: &str);

    fn navigate(&self, path: &str);
}

#[derive(Debug, Default)]
struct HeadlessState {
    visibility: BTreeMap<Group, bool>,
    notifications: Vec<Notification>,
    alerts: Vec<String>,
    navigations: Vec<String>,
}

/// An in-memory page that records everything done to it.
///
/// Used to run the bridge without a renderer, and in tests.
#[derive(Debug)]
pub struct HeadlessPage {
    groups: BTreeSet<Group>,
    logout_trigger: bool,
    notification_container: bool,
    state: Mutex<HeadlessState>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPage {
    /// A page with every group, a logout trigger and a notification container.
    pub fn new() -> Self {
        Self {
            groups: Group::ALL.into_iter().collect(),
            logout_trigger: true,
            notification_container: true,
            state: Mutex::new(HeadlessState::default()),
        }
    }

    /// A page with none of the elements the bridge looks for.
    pub fn bare() -> Self {
        Self {
            groups: BTreeSet::new(),
            logout_trigger: false,
            notification_container: false,
            state: Mutex::new(HeadlessState::default()),
        }
    }

    pub fn with_groups(mut self, groups: &[Group]) -> Self {
        self.groups = groups.iter().copied().collect();
        self
    }

    pub fn with_logout_trigger(mut self, present: bool) -> Self {
        self.logout_trigger = present;
        self
    }

    pub fn with_notification_container(mut self, present: bool) -> Self {
        self.notification_container = present;
        self
    }

    /// Current visibility of a group, `None` if the page has no such
    /// elements or nothing has been applied yet.
    pub fn is_visible(&self, group: Group) -> Option<bool> {
        self.state().visibility.get(&group).copied()
    }

    /// Notifications in the container, in insertion order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state().alerts.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state().navigations.clone()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Page for HeadlessPage {
    fn set_group_visible(&self, group: Group, visible: bool) {
        if self.groups.contains(&group) {
            self.state().visibility.insert(group, visible);
        }
    }

    fn has_logout_trigger(&self) -> bool {
        self.logout_trigger
    }

    fn has_notification_container(&self) -> bool {
        self.notification_container
    }

    fn show_notification(&self, notification: &Notification) {
        if !self.notification_container {
            return;
        }
        let mut state = self.state();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification.id)
        {
            Some(existing) => *existing = notification.clone(),
            None => state.notifications.push(notification.clone()),
        }
    }

    fn remove_notification(&self, id: NotificationId) {
        self.state().notifications.retain(|n| n.id != id);
    }

    fn alert(&self, message: &str) {
        self.state().alerts.push(message.to_string());
    }

    fn navigate(&self, path: &str) {
        self.state().navigations.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_groups_are_ignored() {
        let page = HeadlessPage::new().with_groups(&[Group::Auth]);
        page.set_group_visible(Group::Auth, true);
        page.set_group_visible(Group::Ops, true);

        assert_eq!(page.is_visible(Group::Auth), Some(true));
        assert_eq!(page.is_visible(Group::Ops), None);
    }

    #[test]
    fn test_bare_page_is_inert() {
        let page = HeadlessPage::bare();
        assert!(!page.has_logout_trigger());
        assert!(!page.has_notification_container());

        for group in Group::ALL {
            page.set_group_visible(group, true);
            assert_eq!(page.is_visible(group), None);
        }
        page.remove_notification(NotificationId::new(1));
        assert!(page.notifications().is_empty());
    }
}
