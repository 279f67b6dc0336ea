//! Credential forms, validated locally before any provider call.

use std::fmt;

use super::error::AuthError;

pub const MISSING_FIELDS: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MISSING_CODE: &str = "Please enter the verification code";

/// Email and password for sign-in. Never stored past the call that uses it.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        require(&[&self.email, &self.password], MISSING_FIELDS)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up credentials: [`Credentials`] plus a display name.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SignUpCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpCredentials {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        require(&[&self.name, &self.email, &self.password], MISSING_FIELDS)
    }
}

impl fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The sign-up screen's fields, including the repeated password.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Check the form and turn it into credentials.
    pub fn into_credentials(self) -> Result<SignUpCredentials, AuthError> {
        require(
            &[&self.name, &self.email, &self.password, &self.confirm_password],
            MISSING_FIELDS,
        )?;
        if self.password != self.confirm_password {
            return Err(AuthError::invalid_input(PASSWORD_MISMATCH));
        }
        Ok(SignUpCredentials {
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

/// A verification code must be present; its format is the provider's business.
pub fn validate_code(code: &str) -> Result<(), AuthError> {
    require(&[code], MISSING_CODE)
}

/// Fail with `message` if any field is blank.
pub(crate) fn require(fields: &[&str], message: &str) -> Result<(), AuthError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AuthError::invalid_input(message));
    }
    Ok(())
}
