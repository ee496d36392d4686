use serde::{Deserialize, Serialize};

/// A role the signed-in user can operate under.
///
/// The backend treats roles as an open set; names this client does not
/// recognize round-trip through `Other` so a newer server never breaks
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Parent,
    Other(String),
}

impl Role {
    /// The wire name of the role. Used both in identity payloads and as
    /// the active-role request header value.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "Student",
            Role::Parent => "Parent",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Student" => Role::Student,
            "Parent" => Role::Parent,
            _ => Role::Other(name),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user as returned by the login endpoint.
/// Immutable for the duration of the session; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Non-empty on any successful login.
    pub roles: Vec<Role>,
}

/// In-memory session state.
///
/// Invariant: `token` absent implies `user` and `active_role` absent
/// (the logged-out state). All mutation goes through `SessionStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Identity>,
    pub active_role: Option<Role>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
