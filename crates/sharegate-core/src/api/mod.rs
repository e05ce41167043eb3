//! Authenticated request gateway for the sharegate API.
//!
//! This module provides the `ApiClient` for calling the file-sharing
//! service with the stored bearer token, and the typed file and account
//! endpoints built on top of it.
//!
//! Every outcome is one of: the parsed JSON payload, `Unauthenticated`
//! (no token, nothing sent), `Api` (the server answered with an error)
//! or `Transport` (the exchange could not be completed).

pub mod account;
pub mod client;
pub mod error;
pub mod files;
pub mod transport;

pub use client::{ApiClient, Body, RequestOutcome};
pub use error::{ApiError, TransportError, DEFAULT_API_ERROR_MESSAGE};
pub use transport::{MultipartForm, ReqwestTransport, Transport};
