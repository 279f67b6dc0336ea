//! # Identity of the signed-in user
//!
//! [`UserIdentity`] is the client-side view of the account the identity provider
//! reports for the current session. It is owned by the [`crate::Session`] and replaced
//! wholesale on every successful check; nothing here is ever written back to the
//! provider.
//!
//! - `user_id`: the provider's opaque subject identifier (Cognito `sub`).
//! - `username`: the login name; for this app it is the email the account signed up with.
//! - `email`, `name`: optional profile attributes when the provider returns them.
//!
//! The helper [`UserIdentity::display_name`] returns the user's name or falls back to
//! their email, then to the username.

use serde::{Deserialize, Serialize};

/// User information reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserIdentity {
    /// Get display name, falling back to email and then username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.username)
    }

    /// Local part used to build the reader's inbox address.
    pub fn inbox_handle(&self) -> &str {
        let login = self.email.as_deref().unwrap_or(&self.username);
        login.split('@').next().unwrap_or(login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, email: Option<&str>) -> UserIdentity {
        UserIdentity {
            user_id: "sub-1".to_string(),
            username: "ada@x.com".to_string(),
            email: email.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(user(Some("Ada"), Some("ada@x.com")).display_name(), "Ada");
        assert_eq!(user(None, Some("lovelace@x.com")).display_name(), "lovelace@x.com");
        assert_eq!(user(None, None).display_name(), "ada@x.com");
    }

    #[test]
    fn test_inbox_handle() {
        assert_eq!(user(None, Some("lovelace@x.com")).inbox_handle(), "lovelace");
        assert_eq!(user(None, None).inbox_handle(), "ada");
    }
}
