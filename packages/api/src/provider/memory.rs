use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{
    mask_destination, CodeDelivery, IdentityProvider, ProviderError, ResetPasswordStep,
    SignInOptions, SignInOutput, SignInStep, SignUpOutput, SignUpRequest, SignUpStep,
};
use crate::models::UserIdentity;

/// Code every [`MemoryProvider`] issues unless configured otherwise.
pub const DEFAULT_CONFIRMATION_CODE: &str = "000000";

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
    name: Option<String>,
    confirmed: bool,
    reset_pending: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    failures: VecDeque<ProviderError>,
    challenge: Option<String>,
    calls: usize,
}

/// In-memory IdentityProvider for tests and offline runs.
///
/// Accounts live for the lifetime of the provider. Every code it "sends" is the same
/// fixed confirmation code. Errors use the same codes and wording as the hosted user
/// pool so the gateway's normalization sees realistic input.
#[derive(Clone, Debug)]
pub struct MemoryProvider {
    state: Arc<Mutex<MemoryState>>,
    code: String,
    min_password_len: usize,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            code: DEFAULT_CONFIRMATION_CODE.to_string(),
            min_password_len: 0,
        }
    }
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirmation_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Reject sign-up and reset passwords shorter than `len`.
    pub fn with_min_password_len(mut self, len: usize) -> Self {
        self.min_password_len = len;
        self
    }

    /// Seed a confirmed account.
    pub fn with_account(self, email: &str, password: &str, name: &str) -> Self {
        self.insert(email, password, Some(name), true);
        self
    }

    /// Seed an account that has not confirmed its email yet.
    pub fn with_unconfirmed_account(self, email: &str, password: &str) -> Self {
        self.insert(email, password, None, false);
        self
    }

    /// Start with `email` already signed in, as if a session was restored.
    pub fn with_signed_in(self, email: &str) -> Self {
        self.lock().signed_in = Some(email.to_string());
        self
    }

    /// Make the next call fail with `error`, whatever it is.
    pub fn fail_next(&self, error: ProviderError) {
        self.lock().failures.push_back(error);
    }

    /// Answer every successful password check with `challenge` instead of a session.
    pub fn require_challenge(&self, challenge: impl Into<String>) {
        self.lock().challenge = Some(challenge.into());
    }

    pub fn clear_challenge(&self) {
        self.lock().challenge = None;
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    pub fn signed_in(&self) -> Option<String> {
        self.lock().signed_in.clone()
    }

    pub fn is_confirmed(&self, email: &str) -> bool {
        self.lock()
            .accounts
            .get(email)
            .is_some_and(|account| account.confirmed)
    }

    fn insert(&self, email: &str, password: &str, name: Option<&str>, confirmed: bool) {
        self.lock().accounts.insert(
            email.to_string(),
            Account {
                user_id: uuid::Uuid::new_v4().to_string(),
                password: password.to_string(),
                name: name.map(str::to_string),
                confirmed,
                reset_pending: false,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and hand back any injected failure.
    fn begin_call(&self) -> Result<MutexGuard<'_, MemoryState>, ProviderError> {
        let mut state = self.lock();
        state.calls += 1;
        let failure = state.failures.pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    fn check_password(&self, password: &str) -> Result<(), ProviderError> {
        if password.chars().count() < self.min_password_len {
            return Err(ProviderError::service(
                "InvalidPasswordException",
                "Password did not conform with policy: Password not long enough",
            ));
        }
        Ok(())
    }

    fn delivery(email: &str) -> Option<CodeDelivery> {
        Some(CodeDelivery {
            destination: mask_destination(email),
            medium: "EMAIL".to_string(),
        })
    }
}

fn user_not_found() -> ProviderError {
    ProviderError::service("UserNotFoundException", "User does not exist.")
}

fn code_mismatch() -> ProviderError {
    ProviderError::service(
        "CodeMismatchException",
        "Invalid verification code provided, please try again.",
    )
}

#[async_trait]
impl IdentityProvider for MemoryProvider {
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        _options: SignInOptions,
    ) -> Result<SignInOutput, ProviderError> {
        let mut state = self.begin_call()?;
        let account = state.accounts.get(username).ok_or_else(user_not_found)?;

        if account.password != password {
            return Err(ProviderError::service(
                "NotAuthorizedException",
                "Incorrect username or password.",
            ));
        }
        if !account.confirmed {
            return Err(ProviderError::service(
                "UserNotConfirmedException",
                "User is not confirmed.",
            ));
        }

        if let Some(challenge) = state.challenge.clone() {
            return Ok(SignInOutput {
                is_signed_in: false,
                next_step: SignInStep::Challenge(challenge),
            });
        }

        state.signed_in = Some(username.to_string());
        Ok(SignInOutput {
            is_signed_in: true,
            next_step: SignInStep::Done,
        })
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutput, ProviderError> {
        let mut state = self.begin_call()?;

        if state.accounts.contains_key(&request.username) {
            return Err(ProviderError::service(
                "UsernameExistsException",
                "User already exists",
            ));
        }
        self.check_password(&request.password)?;

        let user_id = uuid::Uuid::new_v4().to_string();
        state.accounts.insert(
            request.username.clone(),
            Account {
                user_id: user_id.clone(),
                password: request.password,
                name: Some(request.attributes.name),
                confirmed: false,
                reset_pending: false,
            },
        );

        Ok(SignUpOutput {
            is_sign_up_complete: false,
            user_id: Some(user_id),
            next_step: SignUpStep::ConfirmSignUp(Self::delivery(&request.attributes.email)),
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<bool, ProviderError> {
        let mut state = self.begin_call()?;
        let account = state
            .accounts
            .get_mut(username)
            .ok_or_else(user_not_found)?;

        if account.confirmed {
            return Err(ProviderError::service(
                "NotAuthorizedException",
                "User cannot be confirmed. Current status is CONFIRMED",
            ));
        }
        if code != self.code {
            return Err(code_mismatch());
        }

        account.confirmed = true;
        Ok(true)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let mut state = self.begin_call()?;
        state.signed_in = None;
        Ok(())
    }

    async fn reset_password(&self, username: &str) -> Result<ResetPasswordStep, ProviderError> {
        let mut state = self.begin_call()?;
        let account = state
            .accounts
            .get_mut(username)
            .ok_or_else(user_not_found)?;

        account.reset_pending = true;
        Ok(ResetPasswordStep::ConfirmWithCode(Self::delivery(username)))
    }

    async fn confirm_reset_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.begin_call()?;
        self.check_password(new_password)?;
        let account = state
            .accounts
            .get_mut(username)
            .ok_or_else(user_not_found)?;

        if !account.reset_pending {
            return Err(ProviderError::service(
                "ExpiredCodeException",
                "Invalid code provided, please request a code again.",
            ));
        }
        if code != self.code {
            return Err(code_mismatch());
        }

        account.password = new_password.to_string();
        account.reset_pending = false;
        Ok(())
    }

    async fn current_user(&self) -> Result<UserIdentity, ProviderError> {
        let state = self.begin_call()?;
        let username = state.signed_in.clone().ok_or_else(ProviderError::no_session)?;
        let account = state.accounts.get(&username).ok_or_else(ProviderError::no_session)?;

        Ok(UserIdentity {
            user_id: account.user_id.clone(),
            username: username.clone(),
            email: Some(username),
            name: account.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::UserAttributes;

    fn sign_up_request(email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            username: email.to_string(),
            password: password.to_string(),
            attributes: UserAttributes {
                email: email.to_string(),
                name: "Ada".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_sign_up_confirm_sign_in() {
        let provider = MemoryProvider::new();

        let output = provider.sign_up(sign_up_request("ada@x.com", "p")).await.unwrap();
        assert!(!output.is_sign_up_complete);
        assert!(output.user_id.is_some());
        assert!(matches!(output.next_step, SignUpStep::ConfirmSignUp(Some(_))));

        let err = provider
            .sign_in("ada@x.com", "p", SignInOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("UserNotConfirmedException"));

        assert!(provider.confirm_sign_up("ada@x.com", "000000").await.unwrap());
        let output = provider
            .sign_in("ada@x.com", "p", SignInOptions::default())
            .await
            .unwrap();
        assert!(output.is_signed_in);
        assert_eq!(output.next_step, SignInStep::Done);

        let user = provider.current_user().await.unwrap();
        assert_eq!(user.username, "ada@x.com");
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_wrong_code_and_duplicate_account() {
        let provider = MemoryProvider::new().with_unconfirmed_account("ada@x.com", "pw");

        let err = provider.confirm_sign_up("ada@x.com", "123456").await.unwrap_err();
        assert_eq!(err.code(), Some("CodeMismatchException"));
        assert!(!provider.is_confirmed("ada@x.com"));

        let custom = MemoryProvider::new()
            .with_confirmation_code("123456")
            .with_unconfirmed_account("bob@x.com", "pw");
        assert!(custom.confirm_sign_up("bob@x.com", "123456").await.unwrap());
        assert!(custom.is_confirmed("bob@x.com"));

        let err = provider.sign_up(sign_up_request("ada@x.com", "pw")).await.unwrap_err();
        assert_eq!(err.code(), Some("UsernameExistsException"));
    }

    #[tokio::test]
    async fn test_password_policy() {
        let provider = MemoryProvider::new().with_min_password_len(8);

        let err = provider.sign_up(sign_up_request("ada@x.com", "short")).await.unwrap_err();
        assert_eq!(err.code(), Some("InvalidPasswordException"));
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let provider = MemoryProvider::new().with_account("ada@x.com", "old", "Ada");

        let err = provider
            .confirm_reset_password("ada@x.com", "000000", "new")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("ExpiredCodeException"));

        let step = provider.reset_password("ada@x.com").await.unwrap();
        assert!(matches!(step, ResetPasswordStep::ConfirmWithCode(Some(_))));

        provider
            .confirm_reset_password("ada@x.com", "000000", "new")
            .await
            .unwrap();
        assert!(provider
            .sign_in("ada@x.com", "new", SignInOptions::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_current_user_without_session() {
        let provider = MemoryProvider::new();

        let err = provider.current_user().await.unwrap_err();
        assert_eq!(err.code(), Some(crate::provider::NO_SESSION_CODE));
    }

    #[tokio::test]
    async fn test_injected_failure_and_call_count() {
        let provider = MemoryProvider::new().with_account("ada@x.com", "pw", "Ada");
        provider.fail_next(ProviderError::Network("offline".to_string()));

        let err = provider.sign_out().await.unwrap_err();
        assert_eq!(err, ProviderError::Network("offline".to_string()));
        assert!(provider.sign_out().await.is_ok());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_challenge_blocks_session() {
        let provider = MemoryProvider::new().with_account("ada@x.com", "pw", "Ada");
        provider.require_challenge("SMS_MFA");

        let output = provider
            .sign_in("ada@x.com", "pw", SignInOptions::default())
            .await
            .unwrap();
        assert!(!output.is_signed_in);
        assert_eq!(output.next_step, SignInStep::Challenge("SMS_MFA".to_string()));
        assert!(provider.signed_in().is_none());
    }
}
