use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

const OPERATIONS: &str = "operations";
const CLIENT: &str = "client";

/// Coarse authorization category used for UI visibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Operations,
    Client,
    Other(String),
    /// A role that is not a JSON string, kept exactly as stored.
    Unrecognized(Value),
}

impl Role {
    /// The role name; `None` for a non-string role.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Role::Operations => Some(OPERATIONS),
            Role::Client => Some(CLIENT),
            Role::Other(s) => Some(s),
            Role::Unrecognized(_) => None,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            OPERATIONS => Role::Operations,
            CLIENT => Role::Client,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Value> for Role {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Role::from(s),
            other => Role::Unrecognized(other),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Role::Unrecognized(value) => value.serialize(serializer),
            Role::Operations => serializer.serialize_str(OPERATIONS),
            Role::Client => serializer.serialize_str(CLIENT),
            Role::Other(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Role::from)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unrecognized(value) => write!(f, "{}", value),
            named => f.write_str(named.as_str().unwrap_or_default()),
        }
    }
}

/// The cached user record written by the login flow.
///
/// Only `role` is interpreted. Every other profile field (id, username,
/// email, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Accept any JSON for `role`. Null reads as no role; other non-string
/// values are kept verbatim as [`Role::Unrecognized`].
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(Role::from(value)),
    })
}

impl UserRecord {
    pub fn new(role: impl Into<Role>) -> Self {
        Self {
            role: Some(role.into()),
            profile: Map::new(),
        }
    }

    /// A record with no role at all.
    pub fn without_role() -> Self {
        Self {
            role: None,
            profile: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.profile.insert(key.to_string(), value.into());
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.profile.get("username").and_then(Value::as_str)
    }
}

/// Credential state read back from storage.
///
/// The token and user entries are only meaningful as a pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Credential {
    #[default]
    Absent,
    Authenticated { token: String, user: UserRecord },
}

impl Credential {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Credential::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Credential::Authenticated { token, .. } => Some(token),
            Credential::Absent => None,
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            Credential::Authenticated { user, .. } => Some(user),
            Credential::Absent => None,
        }
    }
}
