//! User directory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::{Role, UserStatus};

/// A persisted dashboard account.
///
/// Field names match the `users` table columns of the remote record store and
/// the JSON layout of the local fallback slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque identifier assigned by the store
    pub id: String,
    pub name: String,
    /// Email, also used as the login
    pub email: String,
    /// Salted one-way hash of the password
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    /// When the record was created (never mutated)
    pub created_at: DateTime<Utc>,
    /// When the user was last seen
    #[serde(rename = "last_seen")]
    pub last_seen_at: DateTime<Utc>,
}

impl UserRecord {
    /// Display initials derived from the name ("Ana Costa" -> "AC").
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// First character of each whitespace-separated word, upper-cased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Input for creating a user. The password is plaintext and only lives until
/// it is hashed by the directory.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

impl NewUser {
    pub fn new(name: &str, email: &str, password: &str, role: Role, status: UserStatus) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            status,
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("status", &self.status)
            .finish()
    }
}

/// Partial update of a user. Absent fields are left unchanged.
#[derive(Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// New plaintext password, re-hashed before storage
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ana Costa"), "AC");
        assert_eq!(initials("carlos silva santos"), "CSS");
        assert_eq!(initials("  Maria   "), "M");
        assert_eq!(initials(""), "");
        assert_eq!(initials("élodie durand"), "ÉD");
    }

    #[test]
    fn test_record_json_layout() {
        let now = Utc::now();
        let record = UserRecord {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "$2b$04$abc".to_string(),
            role: Role::User,
            status: UserStatus::Active,
            created_at: now,
            last_seen_at: now,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["status"], "active");
        assert!(value.get("last_seen").is_some());
        assert!(value.get("last_seen_at").is_none());
    }

    #[test]
    fn test_new_user_defaults() {
        let json = r#"{"name": "Ana", "email": "ana@x.com", "password": "p1"}"#;
        let user: NewUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = NewUser::new("Ana", "ana@x.com", "secret-pw", Role::User, UserStatus::Active);
        let debug = format!("{:?}", user);
        assert!(!debug.contains("secret-pw"));

        let patch = UserPatch::default().with_password("other-secret");
        assert!(!format!("{:?}", patch).contains("other-secret"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(UserPatch::default().is_empty());
        assert!(!UserPatch::default().with_status(UserStatus::Inactive).is_empty());

        let parsed: UserPatch = serde_json::from_str(r#"{"role": "moderator"}"#).unwrap();
        assert_eq!(parsed.role, Some(Role::Moderator));
        assert!(parsed.name.is_none());
    }
}
