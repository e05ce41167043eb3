//! Sharegate session bridge.
//!
//! Client-side glue for the sharegate file-sharing service. This crate
//! provides:
//!
//! - `auth`: the credential store over persistent key-value storage
//! - `visibility`: role-based UI group activation
//! - `api`: the authenticated request gateway and typed file endpoints
//! - `notify` / `controller`: transient notifications and the page session
//!   lifecycle (initialise, login, logout)
//!
//! Rendering is delegated to a [`page::Page`] implementation and time to a
//! [`clock::Clock`], so the whole session state machine can be driven
//! deterministically in tests.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod controller;
pub mod logging;
pub mod models;
pub mod notify;
pub mod page;
pub mod utils;
pub mod visibility;

pub use api::{ApiClient, ApiError, Body, RequestOutcome};
pub use auth::{Credential, CredentialStore, Role, UserRecord};
pub use config::Config;
pub use controller::SessionController;
pub use visibility::{resolve, Activations, Group, VisibilityState};
