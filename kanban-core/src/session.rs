//! Session record and auth payloads.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile returned by the auth API. Extra server fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
        }
    }

    /// Name shown in the header; falls back to the email address.
    pub fn display_name(&self) -> &str {
        if !self.username.is_empty() {
            return &self.username;
        }
        self.email.as_deref().unwrap_or("")
    }
}

/// Current authentication state, persisted as one JSON record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
            is_authenticated: true,
        }
    }

    /// `Bearer <token>` when a token is held, otherwise empty.
    pub fn auth_header(&self) -> String {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => format!("Bearer {}", token),
            _ => String::new(),
        }
    }
}

/// Successful `/login` or `/register` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_session_layout() {
        let value = serde_json::to_value(Session::empty()).unwrap();
        assert_eq!(
            value,
            json!({"user": null, "token": null, "isAuthenticated": false})
        );
    }

    #[test]
    fn test_authenticated_session_header() {
        let session = Session::authenticated(User::new("ada"), "tok-1");
        assert!(session.is_authenticated);
        assert_eq!(session.auth_header(), "Bearer tok-1");
        assert_eq!(Session::empty().auth_header(), "");
    }

    #[test]
    fn test_user_ignores_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "username": "ada",
            "email": "ada@example.com",
            "created_at": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(user.id, Some(3));
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            id: None,
            username: String::new(),
            email: Some("ada@example.com".to_string()),
        };
        assert_eq!(user.display_name(), "ada@example.com");
    }

    #[test]
    fn test_login_debug_redacts_password() {
        let request = LoginRequest::new("a@b.c", "hunter2");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_register_requires_all_fields() {
        let request = RegisterRequest::new("", "a@b.c", "pw");
        assert_eq!(
            request.validate(),
            Err(ValidationError::EmptyField { field: "username" })
        );
        assert!(RegisterRequest::new("ada", "a@b.c", "pw").validate().is_ok());
    }
}
