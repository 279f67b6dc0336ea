//! # Auth Gateway
//!
//! Thin adapter between credential forms and the [`IdentityProvider`]. Each method
//! reshapes its input into the provider's call (the username is the trimmed email,
//! sign-up sends email and name as attributes, sign-in always uses
//! `USER_PASSWORD_AUTH`), makes exactly one call, and converts any failure into an
//! [`AuthError`]. Nothing is retried.

use std::sync::Arc;

use tracing::{debug, warn};

use super::credentials::{Credentials, SignUpCredentials};
use super::error::{AuthError, AuthErrorKind};
use crate::models::UserIdentity;
use crate::provider::{
    AuthFlow, IdentityProvider, ProviderError, ResetPasswordStep, SignInOptions, SignInStep,
    SignUpOutput, SignUpRequest, UserAttributes,
};

/// Message for a sign-in the provider reported done but not signed in.
pub const SIGN_IN_FAILED: &str = "Sign in failed";

#[derive(Clone)]
pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Sign in; succeeds only when the provider reports the flow complete.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<bool, AuthError> {
        let username = username(&credentials.email);
        debug!(%username, "sign in");

        let options = SignInOptions {
            auth_flow: AuthFlow::UserPassword,
        };
        let output = self
            .provider
            .sign_in(username, &credentials.password, options)
            .await
            .map_err(|e| normalize("sign in", e))?;

        match output.next_step {
            SignInStep::Done if output.is_signed_in => Ok(true),
            SignInStep::Done => {
                warn!(%username, "provider finished sign in without a session");
                Err(AuthError::with_message(
                    AuthErrorKind::Unknown,
                    SIGN_IN_FAILED,
                ))
            }
            step => {
                warn!(%username, %step, "sign in needs another step");
                Err(AuthError::additional_steps(step))
            }
        }
    }

    pub async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<SignUpOutput, AuthError> {
        let username = username(&credentials.email);
        debug!(%username, "sign up");

        let request = SignUpRequest {
            username: username.to_string(),
            password: credentials.password.clone(),
            attributes: UserAttributes {
                email: username.to_string(),
                name: credentials.name.trim().to_string(),
            },
        };
        self.provider
            .sign_up(request)
            .await
            .map_err(|e| normalize("sign up", e))
    }

    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<bool, AuthError> {
        let username = username(email);
        debug!(%username, "confirm sign up");
        self.provider
            .confirm_sign_up(username, code.trim())
            .await
            .map_err(|e| normalize("confirm sign up", e))
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("sign out");
        self.provider
            .sign_out()
            .await
            .map_err(|e| normalize("sign out", e))
    }

    pub async fn reset_password(&self, email: &str) -> Result<ResetPasswordStep, AuthError> {
        let username = username(email);
        debug!(%username, "reset password");
        self.provider
            .reset_password(username)
            .await
            .map_err(|e| normalize("reset password", e))
    }

    pub async fn confirm_reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let username = username(email);
        debug!(%username, "confirm reset password");
        self.provider
            .confirm_reset_password(username, code.trim(), new_password)
            .await
            .map_err(|e| normalize("confirm reset password", e))
    }

    /// The signed-in user; fails when there is no session.
    pub async fn current_user(&self) -> Result<UserIdentity, AuthError> {
        self.provider
            .current_user()
            .await
            .map_err(AuthError::from)
    }
}

fn username(email: &str) -> &str {
    email.trim()
}

fn normalize(operation: &str, error: ProviderError) -> AuthError {
    warn!(operation, code = error.code().unwrap_or("-"), "{error}");
    AuthError::from(error)
}
