//! Users, roles and bearer tokens.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Access level of a user account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::InvalidRole(other.to_owned())),
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password_hash", &"***")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl User {
    #[must_use]
    pub const fn new(
        id: String,
        name: String,
        phone: String,
        password_hash: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { id, name, phone, password_hash, role, created_at }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Opaque bearer token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Filter for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive substring matched against name and phone.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub offset: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::new(
            "u1".to_owned(),
            "Dana".to_owned(),
            "0501234567".to_owned(),
            "$2b$04$secret".to_owned(),
            Role::User,
            Utc::now(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!format!("{user:?}").contains("secret"));
    }

    #[test]
    fn token_expiry_is_inclusive() {
        let now = Utc::now();
        let token = AuthToken {
            token: "t".to_owned(),
            user_id: "u".to_owned(),
            created_at: now,
            expires_at: now,
        };
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - chrono::Duration::seconds(1)));
    }
}
