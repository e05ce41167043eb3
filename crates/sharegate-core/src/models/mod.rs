//! Wire records returned by the sharegate endpoints.

pub mod account;
pub mod file;

pub use account::SignupReceipt;
pub use file::{DownloadLink, FileEntry};
