//! Role-based visibility of page element groups.
//!
//! Pages tag elements with one of four group markers. The credential state
//! is resolved to a [`VisibilityState`], and that state maps through a fixed
//! table to the visibility of every group. The table is always applied in
//! full; groups are never patched individually.

use std::fmt;

use crate::auth::{Credential, Role};

/// A group of page elements toggled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Auth,
    NoAuth,
    Ops,
    Client,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::Auth, Group::NoAuth, Group::Ops, Group::Client];

    /// The group marker used on page elements.
    pub fn marker(self) -> &'static str {
        match self {
            Group::Auth => "auth",
            Group::NoAuth => "no-auth",
            Group::Ops => "ops",
            Group::Client => "client",
        }
    }

    /// CSS class carried by elements of this group.
    pub fn css_class(self) -> &'static str {
        match self {
            Group::Auth => "user-auth",
            Group::NoAuth => "user-no-auth",
            Group::Ops => "user-ops",
            Group::Client => "user-client",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    Unauthenticated,
    AuthenticatedOperations,
    AuthenticatedClient,
    /// Signed in, but the role is missing or not one we know.
    AuthenticatedUnknown,
}

impl VisibilityState {
    pub fn is_authenticated(self) -> bool {
        self != VisibilityState::Unauthenticated
    }

    pub fn activations(self) -> Activations {
        Activations::for_state(self)
    }
}

/// Resolve the visibility state for a credential.
pub fn resolve(credential: &Credential) -> VisibilityState {
    match credential {
        Credential::Absent => VisibilityState::Unauthenticated,
        Credential::Authenticated { user, .. } => match user.role {
            Some(Role::Operations) => VisibilityState::AuthenticatedOperations,
            Some(Role::Client) => VisibilityState::AuthenticatedClient,
            Some(Role::Other(_)) | Some(Role::Unrecognized(_)) | None => {
                VisibilityState::AuthenticatedUnknown
            }
        },
    }
}

/// Visibility of each group for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activations {
    pub auth: bool,
    pub no_auth: bool,
    pub ops: bool,
    pub client: bool,
}

impl Activations {
    pub const fn for_state(state: VisibilityState) -> Self {
        match state {
            VisibilityState::Unauthenticated => Self {
                auth: false,
                no_auth: true,
                ops: false,
                client: false,
            },
            VisibilityState::AuthenticatedOperations => Self {
                auth: true,
                no_auth: false,
                ops: true,
                client: false,
            },
            VisibilityState::AuthenticatedClient => Self {
                auth: true,
                no_auth: false,
                ops: false,
                client: true,
            },
            VisibilityState::AuthenticatedUnknown => Self {
                auth: true,
                no_auth: false,
                ops: false,
                client: false,
            },
        }
    }

    pub fn is_visible(&self, group: Group) -> bool {
        match group {
            Group::Auth => self.auth,
            Group::NoAuth => self.no_auth,
            Group::Ops => self.ops,
            Group::Client => self.client,
        }
    }

    /// Every group paired with its visibility, in `Group::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Group, bool)> + '_ {
        Group::ALL.into_iter().map(move |g| (g, self.is_visible(g)))
    }
}
