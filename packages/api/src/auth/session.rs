//! # Session state holder
//!
//! [`Session`] owns the client's view of who is signed in. There is one per process;
//! the UI receives it through a context object and never constructs its own.
//!
//! State lives in a [`tokio::sync::watch`] channel: the session is the only writer,
//! and every screen that calls [`Session::subscribe`] is notified of each change.
//!
//! Operations share a single in-flight slot. While one is outstanding any other is
//! rejected at once with [`AuthErrorKind::Busy`], before touching state or the
//! provider. The slot is released when the operation returns, so calls made one
//! after another never block each other.
//!
//! Input is validated before the slot is taken, so a form with missing fields leaves
//! both the session and the provider untouched.
//!
//! The startup check in [`Session::initialize`] does not take the slot. Every write to
//! `is_authenticated` bumps a generation counter, and the startup result is dropped if
//! the generation moved while the provider was answering.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::credentials::{require, validate_code, Credentials, SignUpCredentials, MISSING_FIELDS};
use super::error::{AuthError, AuthErrorKind};
use super::gateway::AuthGateway;
use crate::models::UserIdentity;
use crate::provider::{IdentityProvider, ResetPasswordStep, SignUpOutput};

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    /// True until the startup check has finished.
    pub is_loading: bool,
    /// `Some` only while authenticated.
    pub user: Option<UserIdentity>,
    pub last_error: Option<AuthError>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            user: None,
            last_error: None,
        }
    }
}

pub struct Session {
    gateway: AuthGateway,
    state: watch::Sender<SessionState>,
    in_flight: AtomicBool,
    initialized: AtomicBool,
    /// Bumped on every sign-in or sign-out outcome.
    generation: AtomicU64,
}

/// Holds the in-flight slot until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(slot: &'a AtomicBool) -> Result<Self, AuthError> {
        slot.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| InFlight(slot))
            .map_err(|_| AuthError::new(AuthErrorKind::Busy))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            gateway: AuthGateway::new(provider),
            state,
            in_flight: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that is marked changed on every state update.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Whether an operation currently holds the in-flight slot.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask the provider for an existing session. Runs once; later calls do nothing.
    ///
    /// Never fails: any error, including "no session", leaves the user anonymous.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return;
        }

        let seen = self.generation.load(Ordering::Acquire);
        let user = match self.gateway.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "restored session");
                Some(user)
            }
            Err(err) => {
                debug!("no existing session: {err}");
                None
            }
        };

        self.state.send_modify(|state| {
            if self.generation.load(Ordering::Acquire) == seen {
                state.is_authenticated = user.is_some();
                state.user = user;
            } else {
                debug!("startup check superseded");
            }
            state.is_loading = false;
        });
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        credentials.validate()?;
        let _slot = self.begin()?;

        match self.gateway.sign_in(credentials).await {
            Ok(signed_in) => {
                // Best effort: `user` stays empty if the lookup fails
                let user = if signed_in {
                    self.gateway.current_user().await.ok()
                } else {
                    None
                };
                info!(signed_in, "signed in");
                self.set_authenticated(signed_in, user);
                Ok(())
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    self.generation.fetch_add(1, Ordering::AcqRel);
                    state.is_authenticated = false;
                    state.user = None;
                    state.last_error = Some(err.clone());
                });
                Err(err)
            }
        }
    }

    pub async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<SignUpOutput, AuthError> {
        credentials.validate()?;
        let _slot = self.begin()?;

        let result = self.gateway.sign_up(credentials).await;
        if result.is_ok() {
            info!("account created, awaiting confirmation");
        }
        self.record(result)
    }

    /// Returns whether sign-up is now complete.
    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<bool, AuthError> {
        require(&[email], MISSING_FIELDS)?;
        validate_code(code)?;
        let _slot = self.begin()?;

        let result = self.gateway.confirm_sign_up(email, code).await;
        self.record(result)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let _slot = self.begin()?;

        let result = self.gateway.sign_out().await;
        if result.is_ok() {
            info!("signed out");
            self.set_authenticated(false, None);
        }
        self.record(result)
    }

    pub async fn reset_password(&self, email: &str) -> Result<ResetPasswordStep, AuthError> {
        require(&[email], MISSING_FIELDS)?;
        let _slot = self.begin()?;

        let result = self.gateway.reset_password(email).await;
        self.record(result)
    }

    pub async fn confirm_reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        require(&[email, new_password], MISSING_FIELDS)?;
        validate_code(code)?;
        let _slot = self.begin()?;

        let result = self
            .gateway
            .confirm_reset_password(email, code, new_password)
            .await;
        if result.is_ok() {
            info!("password reset");
        }
        self.record(result)
    }

    /// Sign-in and sign-out outcomes supersede a pending startup check.
    fn set_authenticated(&self, is_authenticated: bool, user: Option<UserIdentity>) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            state.is_authenticated = is_authenticated;
            state.user = user;
        });
    }

    /// Take the in-flight slot and clear the previous error.
    fn begin(&self) -> Result<InFlight<'_>, AuthError> {
        let slot = InFlight::acquire(&self.in_flight)?;
        self.state.send_if_modified(|state| state.last_error.take().is_some());
        Ok(slot)
    }

    fn record<T>(&self, result: Result<T, AuthError>) -> Result<T, AuthError> {
        if let Err(err) = &result {
            self.state
                .send_modify(|state| state.last_error = Some(err.clone()));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        MemoryProvider, ProviderError, SignInOptions, SignInOutput, SignInStep, SignUpRequest,
    };
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn session(provider: &MemoryProvider) -> Session {
        Session::new(Arc::new(provider.clone()))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let state = session(&MemoryProvider::new()).state();
        assert!(state.is_loading);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_initialize_without_session() {
        let provider = MemoryProvider::new();
        let session = session(&provider);

        session.initialize().await;

        let state = session.state();
        assert!(!state.is_loading);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_initialize_restores_session_once() {
        let provider = MemoryProvider::new()
            .with_account("ada@x.com", "pw", "Ada")
            .with_signed_in("ada@x.com");
        let session = session(&provider);
        let mut changes = session.subscribe();

        session.initialize().await;
        session.initialize().await;

        assert!(changes.has_changed().unwrap());
        let state = changes.borrow_and_update().clone();
        assert!(!state.is_loading);
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().display_name(), "Ada");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_initialize_swallows_provider_failure() {
        let provider = MemoryProvider::new().with_signed_in("ada@x.com");
        provider.fail_next(ProviderError::Network("offline".to_string()));
        let session = session(&provider);

        session.initialize().await;

        assert!(!session.state().is_loading);
        assert!(!session.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_missing_fields_skip_provider() {
        let provider = MemoryProvider::new().with_account("ada@x.com", "pw", "Ada");
        let session = session(&provider);
        let before = session.state();

        let err = session
            .sign_in(&Credentials::new("ada@x.com", ""))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Please fill in all fields");
        assert!(err.is_local());

        let err = session
            .sign_up(&SignUpCredentials::new("", "bob@x.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidInput);

        let err = session.confirm_sign_up("ada@x.com", "").await.unwrap_err();
        assert_eq!(err.message, "Please enter the verification code");

        assert_eq!(provider.calls(), 0);
        assert_eq!(session.state(), before);
    }

    #[tokio::test]
    async fn test_sign_up_confirm_sign_in() {
        let provider = MemoryProvider::new();
        let session = session(&provider);
        session.initialize().await;

        session
            .sign_up(&SignUpCredentials::new("Ada", "ada@x.com", "p"))
            .await
            .unwrap();
        assert!(session.confirm_sign_up("ada@x.com", "000000").await.unwrap());
        session
            .sign_in(&Credentials::new("ada@x.com", "p"))
            .await
            .unwrap();

        let state = session.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().name.as_deref(), Some("Ada"));
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_unconfirmed_sign_in_records_error() {
        let provider = MemoryProvider::new().with_unconfirmed_account("ada@x.com", "pw");
        let session = session(&provider);

        let err = session
            .sign_in(&Credentials::new("ada@x.com", "pw"))
            .await
            .unwrap_err();

        assert!(err.needs_confirmation());
        let state = session.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.last_error, Some(err));

        // The next attempt starts from a clean error slot
        provider.fail_next(ProviderError::service(
            "NotAuthorizedException",
            "Incorrect username or password.",
        ));
        let err = session
            .sign_in(&Credentials::new("ada@x.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(
            session.state().last_error.map(|e| e.message),
            Some("Incorrect email or password".to_string())
        );
        assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_challenge_leaves_session_anonymous() {
        let provider = MemoryProvider::new().with_account("ada@x.com", "pw", "Ada");
        provider.require_challenge("SMS_MFA");
        let session = session(&provider);

        let err = session
            .sign_in(&Credentials::new("ada@x.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, AuthErrorKind::AdditionalStepsRequired);
        assert_eq!(err.message, "Additional authentication steps required");
        assert!(!session.state().is_authenticated);
        assert!(session.state().user.is_none());

        provider.clear_challenge();
        session
            .sign_in(&Credentials::new("ada@x.com", "pw"))
            .await
            .unwrap();
        assert!(session.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_sign_out() {
        let provider = MemoryProvider::new()
            .with_account("ada@x.com", "pw", "Ada")
            .with_signed_in("ada@x.com");
        let session = session(&provider);
        session.initialize().await;
        assert!(session.state().is_authenticated);

        session.sign_out().await.unwrap();

        let state = session.state();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(provider.signed_in().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_session() {
        let provider = MemoryProvider::new()
            .with_account("ada@x.com", "pw", "Ada")
            .with_signed_in("ada@x.com");
        let session = session(&provider);
        session.initialize().await;

        provider.fail_next(ProviderError::Network("offline".to_string()));
        let err = session.sign_out().await.unwrap_err();

        assert_eq!(err.message, "offline");
        assert!(session.state().is_authenticated);
        assert_eq!(session.state().last_error, Some(err));
    }

    #[tokio::test]
    async fn test_sequential_resets_not_blocked() {
        let provider = MemoryProvider::new().with_account("a@x.com", "pw", "A");
        let session = session(&provider);

        let first = session.reset_password("a@x.com").await.unwrap();
        let second = session.reset_password("a@x.com").await.unwrap();

        assert!(matches!(first, ResetPasswordStep::ConfirmWithCode(_)));
        assert!(matches!(second, ResetPasswordStep::ConfirmWithCode(_)));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_confirm_reset_password() {
        let provider = MemoryProvider::new().with_account("a@x.com", "old", "A");
        let session = session(&provider);

        session.reset_password("a@x.com").await.unwrap();
        let err = session
            .confirm_reset_password("a@x.com", "999999", "new")
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidCode);

        session
            .confirm_reset_password("a@x.com", "000000", "new")
            .await
            .unwrap();
        assert!(session.state().last_error.is_none());
        session
            .sign_in(&Credentials::new("a@x.com", "new"))
            .await
            .unwrap();
        assert!(session.state().is_authenticated);
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Gate {
        ResetPassword,
        CurrentUser,
    }

    /// Wraps a [`MemoryProvider`]. The first call of the gated kind is held open
    /// until released; the sign-in answer can be replaced outright.
    struct GatedProvider {
        inner: MemoryProvider,
        gate: Option<Gate>,
        armed: AtomicBool,
        entered: Notify,
        release: Notify,
        sign_in_answer: Option<SignInOutput>,
    }

    impl GatedProvider {
        fn new(inner: MemoryProvider, gate: Option<Gate>) -> Self {
            Self {
                inner,
                gate,
                armed: AtomicBool::new(true),
                entered: Notify::new(),
                release: Notify::new(),
                sign_in_answer: None,
            }
        }

        async fn hold(&self, call: Gate) {
            if self.gate == Some(call) && self.armed.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for GatedProvider {
        async fn sign_in(
            &self,
            username: &str,
            password: &str,
            options: SignInOptions,
        ) -> Result<SignInOutput, ProviderError> {
            match &self.sign_in_answer {
                Some(answer) => Ok(answer.clone()),
                None => self.inner.sign_in(username, password, options).await,
            }
        }

        async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutput, ProviderError> {
            self.inner.sign_up(request).await
        }

        async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<bool, ProviderError> {
            self.inner.confirm_sign_up(username, code).await
        }

        async fn sign_out(&self) -> Result<(), ProviderError> {
            self.inner.sign_out().await
        }

        async fn reset_password(&self, username: &str) -> Result<ResetPasswordStep, ProviderError> {
            self.hold(Gate::ResetPassword).await;
            self.inner.reset_password(username).await
        }

        async fn confirm_reset_password(
            &self,
            username: &str,
            code: &str,
            new_password: &str,
        ) -> Result<(), ProviderError> {
            self.inner
                .confirm_reset_password(username, code, new_password)
                .await
        }

        async fn current_user(&self) -> Result<UserIdentity, ProviderError> {
            // Answer first, then wait: the result is already stale when released
            let answer = self.inner.current_user().await;
            self.hold(Gate::CurrentUser).await;
            answer
        }
    }

    #[tokio::test]
    async fn test_concurrent_operation_is_busy() {
        let inner = MemoryProvider::new().with_account("a@x.com", "pw", "A");
        let gated = Arc::new(GatedProvider::new(inner.clone(), Some(Gate::ResetPassword)));
        let session = Session::new(gated.clone());

        let first = session.reset_password("a@x.com");
        let second = async {
            gated.entered.notified().await;
            assert!(session.is_busy());
            let err = session
                .sign_in(&Credentials::new("a@x.com", "pw"))
                .await
                .unwrap_err();
            // Rejection leaves state alone
            assert!(session.state().last_error.is_none());
            gated.release.notify_one();
            err
        };
        let (first, busy) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert_eq!(busy.kind, AuthErrorKind::Busy);
        assert_eq!(busy.message, "Another request is already in progress");
        assert!(busy.is_local());
        assert_eq!(inner.calls(), 1);
        assert!(!session.is_busy());
        assert!(!session.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_sign_in_during_startup_check_wins() {
        let inner = MemoryProvider::new().with_account("a@x.com", "pw", "A");
        let gated = Arc::new(GatedProvider::new(inner.clone(), Some(Gate::CurrentUser)));
        let session = Session::new(gated.clone());

        let startup = session.initialize();
        let sign_in = async {
            gated.entered.notified().await;
            session
                .sign_in(&Credentials::new("a@x.com", "pw"))
                .await
                .unwrap();
            assert!(session.state().is_authenticated);
            gated.release.notify_one();
        };
        tokio::join!(startup, sign_in);

        let state = session.state();
        assert!(!state.is_loading);
        assert!(state.is_authenticated);
        assert_eq!(state.user.map(|u| u.username), Some("a@x.com".to_string()));
        assert_eq!(inner.signed_in().as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_sign_out_during_startup_check_wins() {
        let inner = MemoryProvider::new()
            .with_account("a@x.com", "pw", "A")
            .with_signed_in("a@x.com");
        let gated = Arc::new(GatedProvider::new(inner.clone(), Some(Gate::CurrentUser)));
        let session = Session::new(gated.clone());

        let startup = session.initialize();
        let sign_out = async {
            gated.entered.notified().await;
            session.sign_out().await.unwrap();
            gated.release.notify_one();
        };
        tokio::join!(startup, sign_out);

        let state = session.state();
        assert!(!state.is_loading);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_done_without_session_fails() {
        let inner = MemoryProvider::new().with_account("a@x.com", "pw", "A");
        let mut provider = GatedProvider::new(inner, None);
        provider.sign_in_answer = Some(SignInOutput {
            is_signed_in: false,
            next_step: SignInStep::Done,
        });
        let session = Session::new(Arc::new(provider));
        session.initialize().await;

        let err = session
            .sign_in(&Credentials::new("a@x.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, AuthErrorKind::Unknown);
        assert_eq!(err.message, "Sign in failed");
        let state = session.state();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert_eq!(state.last_error, Some(err));
    }
}
