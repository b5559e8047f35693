use serde::{Deserialize, Serialize};

/// Capability tag restricting a session to one resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_PARTS")]
    Parts,
    #[serde(rename = "ROLE_RECORDS")]
    Records,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Parts => "ROLE_PARTS",
            Role::Records => "ROLE_RECORDS",
        }
    }
}

/// Identity returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

/// Username/password pair handed to [`AuthStore::login`](crate::AuthStore::login).
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}
