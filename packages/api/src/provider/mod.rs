//! # Identity provider client
//!
//! The [`IdentityProvider`] trait is the fixed call contract between this app and the
//! managed identity service. Everything above it (the [`crate::AuthGateway`] and the
//! [`crate::Session`]) only ever talks to a `dyn IdentityProvider`, so the same flow
//! runs against the hosted user pool or an in-process stand-in.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`CognitoProvider`] | Cognito user-pool JSON API over HTTPS, tokens cached on disk. |
//! | [`MemoryProvider`] | In-process accounts for tests and offline runs. |
//!
//! Every method is a single request/response round trip. Retry and latency behaviour
//! are whatever the implementation does internally; callers never retry.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserIdentity;

mod cognito;
mod memory;
mod token_cache;

pub use cognito::CognitoProvider;
pub use memory::{MemoryProvider, DEFAULT_CONFIRMATION_CODE};
pub use token_cache::{CacheError, TokenCache, Tokens};

/// Error code the provider reports when no session exists.
pub const NO_SESSION_CODE: &str = "UserUnAuthenticatedException";

/// Failure reported by an identity provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The service rejected the request with a structured error code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    /// The service could not be reached.
    #[error("{0}")]
    Network(String),
    /// The service answered with something that could not be interpreted.
    #[error("unexpected provider response: {0}")]
    Unexpected(String),
}

impl ProviderError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn no_session() -> Self {
        Self::service(
            NO_SESSION_CODE,
            "User needs to be authenticated to call this API.",
        )
    }

    /// The structured error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ProviderError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Authentication flow requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthFlow {
    #[default]
    UserPassword,
}

impl AuthFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFlow::UserPassword => "USER_PASSWORD_AUTH",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignInOptions {
    pub auth_flow: AuthFlow,
}

/// What the provider needs next before a sign-in is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInStep {
    Done,
    ConfirmSignUp,
    ResetPassword,
    /// A challenge such as `SMS_MFA` or `NEW_PASSWORD_REQUIRED`.
    Challenge(String),
}

impl fmt::Display for SignInStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignInStep::Done => f.write_str("DONE"),
            SignInStep::ConfirmSignUp => f.write_str("CONFIRM_SIGN_UP"),
            SignInStep::ResetPassword => f.write_str("RESET_PASSWORD"),
            SignInStep::Challenge(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutput {
    pub is_signed_in: bool,
    pub next_step: SignInStep,
}

/// Where a one-time code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDelivery {
    /// Masked destination, e.g. `a***@x.com`
    pub destination: String,
    /// `EMAIL` or `SMS`
    pub medium: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpStep {
    Done,
    ConfirmSignUp(Option<CodeDelivery>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutput {
    pub is_sign_up_complete: bool,
    pub user_id: Option<String>,
    pub next_step: SignUpStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetPasswordStep {
    ConfirmWithCode(Option<CodeDelivery>),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttributes {
    pub email: String,
    pub name: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub attributes: UserAttributes,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Call contract of the managed identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        options: SignInOptions,
    ) -> Result<SignInOutput, ProviderError>;

    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutput, ProviderError>;

    /// Returns whether sign-up is now complete.
    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<bool, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    async fn reset_password(&self, username: &str) -> Result<ResetPasswordStep, ProviderError>;

    async fn confirm_reset_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ProviderError>;

    /// Fails with [`NO_SESSION_CODE`] when nobody is signed in.
    async fn current_user(&self) -> Result<UserIdentity, ProviderError>;
}

/// Mask an email the way code-delivery details are shown: `a***@x.com`.
pub(crate) fn mask_destination(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
