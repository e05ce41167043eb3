use serde::{Deserialize, Serialize};

/// Answer to a successful signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupReceipt {
    #[serde(default)]
    pub message: String,
    /// Link that verifies the new account's email address
    #[serde(default)]
    pub verification_url: Option<String>,
}
