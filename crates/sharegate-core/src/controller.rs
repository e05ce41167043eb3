//! Page session lifecycle.
//!
//! A `SessionController` is created once per page. It applies the
//! visibility table on load and whenever credentials change, performs
//! logout (clear, notify, redirect after a delay) and owns the page's
//! notifier. Navigation ends the page session; once it has happened every
//! further call is a no-op.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::api::RequestOutcome;
use crate::auth::{CredentialStore, StorageError, UserRecord};
use crate::clock::Clock;
use crate::notify::{select_notifier, NotificationKind, NotificationTiming, Notifier};
use crate::page::Page;
use crate::visibility::{resolve, VisibilityState};

/// Delay between logout and the redirect to the root page
pub const DEFAULT_LOGOUT_REDIRECT_MS: i64 = 1000;

pub const LOGOUT_MESSAGE: &str = "You have been logged out successfully!";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub root_path: String,
    pub logout_redirect: Duration,
    pub notifications: NotificationTiming,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            root_path: "/".to_string(),
            logout_redirect: Duration::milliseconds(DEFAULT_LOGOUT_REDIRECT_MS),
            notifications: NotificationTiming::default(),
        }
    }
}

pub struct SessionController {
    store: CredentialStore,
    page: Arc<dyn Page>,
    clock: Arc<dyn Clock>,
    notifier: Box<dyn Notifier>,
    settings: SessionSettings,
    visibility: VisibilityState,
    logout_bound: bool,
    redirect_at: Option<DateTime<Utc>>,
    navigated: bool,
}

impl SessionController {
    pub fn new(
        store: CredentialStore,
        page: Arc<dyn Page>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        let notifier = select_notifier(page.clone(), settings.notifications);
        Self {
            store,
            page,
            clock,
            notifier,
            settings,
            visibility: VisibilityState::Unauthenticated,
            logout_bound: false,
            redirect_at: None,
            navigated: false,
        }
    }

    /// Page-ready hook: apply visibility and bind the logout trigger.
    pub fn initialize(&mut self) -> VisibilityState {
        if self.navigated {
            return self.visibility;
        }
        self.logout_bound = self.page.has_logout_trigger();
        let state = self.refresh_visibility();
        info!(?state, logout_bound = self.logout_bound, "Session initialized");
        state
    }

    /// Re-read credentials and apply the full activation table.
    pub fn refresh_visibility(&mut self) -> VisibilityState {
        if self.navigated {
            return self.visibility;
        }
        let state = resolve(&self.store.read());
        for (group, visible) in state.activations().iter() {
            self.page.set_group_visible(group, visible);
        }
        if state != self.visibility {
            debug!(from = ?self.visibility, to = ?state, "Visibility changed");
        }
        self.visibility = state;
        state
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Keep credentials from a successful login and update the page.
    pub fn sign_in(&mut self, token: &str, user: &UserRecord) -> Result<VisibilityState, StorageError> {
        self.store.store(token, user)?;
        Ok(self.refresh_visibility())
    }

    /// Click handler for the logout trigger. Does nothing if the page has
    /// no trigger element. Returns whether logout ran.
    pub fn on_logout_trigger(&mut self) -> bool {
        if !self.logout_bound {
            debug!("Logout trigger fired on a page without one");
            return false;
        }
        self.logout();
        true
    }

    /// Clear credentials, tell the user, and schedule the redirect home.
    ///
    /// The redirect is scheduled whichever notifier is in use. Repeated
    /// calls before it fires keep the first deadline.
    pub fn logout(&mut self) {
        if self.navigated {
            return;
        }
        self.store.clear();
        self.refresh_visibility();
        self.notify(NotificationKind::Success, LOGOUT_MESSAGE);

        let now = self.clock.now();
        let deadline = now
            .checked_add_signed(self.settings.logout_redirect)
            .unwrap_or_else(|| {
                warn!("Logout redirect delay out of range, redirecting immediately");
                now
            });
        let deadline = *self.redirect_at.get_or_insert(deadline);
        info!(redirect_at = %deadline, "Logged out");
    }

    /// Show a notification on the page.
    pub fn notify(&mut self, kind: NotificationKind, message: &str) {
        if self.navigated {
            return;
        }
        let now = self.clock.now();
        self.notifier.notify(kind, message, now);
    }

    /// Surface a request outcome: failures always, successes when the
    /// server sent a message.
    pub fn report(&mut self, outcome: &RequestOutcome) {
        if outcome.ok {
            if !outcome.status_message.is_empty() {
                self.notify(NotificationKind::Success, &outcome.status_message);
            }
        } else {
            warn!(message = %outcome.status_message, "Request failed");
            self.notify(NotificationKind::Error, &outcome.status_message);
        }
    }

    /// Run every timer due now. Returns true if this tick navigated away.
    pub fn tick(&mut self) -> bool {
        if self.navigated {
            return false;
        }
        let now = self.clock.now();
        self.notifier.tick(now);

        match self.redirect_at {
            Some(at) if now >= at => {
                self.redirect_at = None;
                self.navigated = true;
                info!(path = %self.settings.root_path, "Redirecting after logout");
                self.page.navigate(&self.settings.root_path);
                true
            }
            _ => false,
        }
    }

    /// The earliest pending timer.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        if self.navigated {
            return None;
        }
        match (self.notifier.next_deadline(), self.redirect_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Sleep until each pending timer and run it, until nothing is pending
    /// or the page has navigated away.
    pub async fn run_until_idle(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            let wait = deadline - self.clock.now();
            if wait > Duration::zero() {
                self.clock.sleep(wait).await;
            }
            if self.tick() {
                break;
            }
        }
    }

    pub fn redirect_pending(&self) -> bool {
        self.redirect_at.is_some()
    }

    pub fn is_navigated(&self) -> bool {
        self.navigated
    }
}
