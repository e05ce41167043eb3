//! Authentication state kept on the client.
//!
//! This module provides:
//! - `KeyValueStorage`: persistent string slots (memory, JSON file, OS keyring)
//! - `CredentialStore`: the paired `token` / `user` entries over a storage
//! - `Credential`, `UserRecord`, `Role`: the data read back from the store
//!
//! Stored credentials are advisory UI state only. Malformed or partially
//! cleared entries always read back as `Credential::Absent`.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::CredentialStore;
pub use session::{Credential, Role, UserRecord};
pub use storage::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage, StorageError};
