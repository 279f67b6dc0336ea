//! # User-facing authentication errors
//!
//! Every failure that reaches a screen is an [`AuthError`]: a kind from the fixed
//! [`AuthErrorKind`] taxonomy plus the message to display. Provider failures are turned
//! into `AuthError`s in exactly one place, the `From<ProviderError>` impl below, which
//! runs the provider's structured code through [`PROVIDER_CODES`]:
//!
//! - a recognised code yields its kind and that kind's fixed message;
//! - an unrecognised service error keeps the provider's own message (kind `Unknown`);
//! - a network failure keeps its description (kind `Unknown`);
//! - a response that could not be interpreted becomes the generic unexpected-error
//!   message.
//!
//! Matching is by substring over the code, first entry wins. When the provider gave no
//! usable code the message is searched the same way.

use thiserror::Error;

use crate::provider::{ProviderError, SignInStep};

/// Why an authentication operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    UnconfirmedAccount,
    AccountNotFound,
    InvalidCredentials,
    InvalidInput,
    InvalidCode,
    ExpiredCode,
    RateLimited,
    DuplicateAccount,
    WeakPassword,
    DeliveryFailure,
    AdditionalStepsRequired,
    /// Another operation on the same session is still outstanding.
    Busy,
    Unknown,
}

impl AuthErrorKind {
    /// The fixed message shown for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::UnconfirmedAccount => "Please verify your email address",
            AuthErrorKind::AccountNotFound => "Account not found. Please check your email",
            AuthErrorKind::InvalidCredentials => "Incorrect email or password",
            AuthErrorKind::InvalidInput => "Please check your input",
            AuthErrorKind::InvalidCode => "Invalid verification code",
            AuthErrorKind::ExpiredCode => "Verification code has expired",
            AuthErrorKind::RateLimited => "Too many attempts. Please try again later",
            AuthErrorKind::DuplicateAccount => "An account with this email already exists",
            AuthErrorKind::WeakPassword => {
                "Password must be at least 8 characters and contain uppercase, lowercase, numbers, and symbols"
            }
            AuthErrorKind::DeliveryFailure => "Failed to send verification code. Please try again",
            AuthErrorKind::AdditionalStepsRequired => "Additional authentication steps required",
            AuthErrorKind::Busy => "Another request is already in progress",
            AuthErrorKind::Unknown => "An unexpected error occurred. Please try again",
        }
    }
}

/// Provider error codes and the kind each one maps to, in match order.
pub const PROVIDER_CODES: &[(&str, AuthErrorKind)] = &[
    ("UserNotConfirmedException", AuthErrorKind::UnconfirmedAccount),
    ("UserNotFoundException", AuthErrorKind::AccountNotFound),
    ("NotAuthorizedException", AuthErrorKind::InvalidCredentials),
    ("InvalidParameterException", AuthErrorKind::InvalidInput),
    ("CodeMismatchException", AuthErrorKind::InvalidCode),
    ("ExpiredCodeException", AuthErrorKind::ExpiredCode),
    ("LimitExceededException", AuthErrorKind::RateLimited),
    ("UsernameExistsException", AuthErrorKind::DuplicateAccount),
    ("InvalidPasswordException", AuthErrorKind::WeakPassword),
    ("CodeDeliveryFailureException", AuthErrorKind::DeliveryFailure),
    ("TooManyRequestsException", AuthErrorKind::RateLimited),
    ("TooManyFailedAttemptsException", AuthErrorKind::RateLimited),
];

/// Look up the kind for a provider error identifier.
pub fn classify(identifier: &str) -> Option<AuthErrorKind> {
    PROVIDER_CODES
        .iter()
        .find(|(code, _)| identifier.contains(code))
        .map(|(_, kind)| *kind)
}

/// A normalized authentication failure, ready to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
    /// The step the provider asked for, for `AdditionalStepsRequired`.
    pub pending_step: Option<SignInStep>,
}

impl AuthError {
    /// Error of `kind` with its fixed message.
    pub fn new(kind: AuthErrorKind) -> Self {
        Self::with_message(kind, kind.message())
    }

    pub fn with_message(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            pending_step: None,
        }
    }

    pub fn additional_steps(step: SignInStep) -> Self {
        Self {
            pending_step: Some(step),
            ..Self::new(AuthErrorKind::AdditionalStepsRequired)
        }
    }

    /// Input rejected before any provider call.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(AuthErrorKind::InvalidInput, message)
    }

    /// The account exists but its email has not been confirmed yet.
    pub fn needs_confirmation(&self) -> bool {
        self.kind == AuthErrorKind::UnconfirmedAccount
    }

    /// Raised on the client before any provider call: form validation or `Busy`.
    /// A session returns these without storing them in `last_error`.
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind,
            AuthErrorKind::InvalidInput | AuthErrorKind::Busy
        )
    }
}

impl From<ProviderError> for AuthError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Service { code, message } => {
                match classify(&code).or_else(|| classify(&message)) {
                    Some(kind) => AuthError::new(kind),
                    None => AuthError::with_message(AuthErrorKind::Unknown, message),
                }
            }
            ProviderError::Network(message) => {
                AuthError::with_message(AuthErrorKind::Unknown, message)
            }
            ProviderError::Unexpected(_) => AuthError::new(AuthErrorKind::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_authorized_message() {
        let err = AuthError::from(ProviderError::service(
            "NotAuthorizedException",
            "Incorrect username or password.",
        ));
        assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
        assert_eq!(err.message, "Incorrect email or password");
        assert_eq!(err.to_string(), "Incorrect email or password");
    }

    #[test]
    fn test_every_code_maps_to_its_kind() {
        for (code, kind) in PROVIDER_CODES {
            let err = AuthError::from(ProviderError::service(*code, "provider wording"));
            assert_eq!(err.kind, *kind, "{code}");
            assert_eq!(err.message, kind.message(), "{code}");
        }
    }

    #[test]
    fn test_unmatched_error_passes_through() {
        let err = AuthError::from(ProviderError::service(
            "InternalErrorException",
            "Something broke upstream",
        ));
        assert_eq!(err.kind, AuthErrorKind::Unknown);
        assert_eq!(err.message, "Something broke upstream");

        let err = AuthError::from(ProviderError::Network("connection refused".to_string()));
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn test_unexpected_response_is_generic() {
        let err = AuthError::from(ProviderError::Unexpected("HTTP 502".to_string()));
        assert_eq!(err.kind, AuthErrorKind::Unknown);
        assert_eq!(err.message, "An unexpected error occurred. Please try again");
    }

    #[test]
    fn test_identifier_found_in_message() {
        // Some SDK layers fold the code into the message and leave the code generic.
        let err = AuthError::from(ProviderError::service(
            "Error",
            "UserNotConfirmedException: User is not confirmed.",
        ));
        assert!(err.needs_confirmation());
    }

    #[test]
    fn test_additional_steps_carries_step() {
        let err = AuthError::additional_steps(SignInStep::Challenge("SMS_MFA".to_string()));
        assert_eq!(err.kind, AuthErrorKind::AdditionalStepsRequired);
        assert_eq!(err.message, "Additional authentication steps required");
        assert_eq!(
            err.pending_step,
            Some(SignInStep::Challenge("SMS_MFA".to_string()))
        );
    }

    #[test]
    fn test_local_errors() {
        assert!(AuthError::new(AuthErrorKind::Busy).is_local());
        assert!(AuthError::invalid_input("Please fill in all fields").is_local());
        assert!(!AuthError::new(AuthErrorKind::InvalidCode).is_local());
        assert!(!AuthError::from(ProviderError::Network("offline".to_string())).is_local());
    }
}
