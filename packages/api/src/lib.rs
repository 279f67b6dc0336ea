//! # API crate: authentication for the Dimly reader
//!
//! Everything the app knows about who is signed in goes through this crate. The UI
//! holds one [`Session`], calls its async operations from screens, and re-renders on
//! the state changes it publishes.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Credential forms, [`AuthGateway`] (provider calls and error normalization), [`Session`] state holder, identity configuration from the environment |
//! | [`models`] | [`UserIdentity`], the provider's view of the current account |
//! | [`provider`] | [`IdentityProvider`] call contract with the Cognito and in-memory implementations, on-disk token cache |
//!
//! ## Flow
//!
//! ```text
//! screen ─▶ Session ─▶ AuthGateway ─▶ dyn IdentityProvider
//!   ▲          │             │
//!   └─ watch ◀─┘◀─ AuthError ┘
//! ```
//!
//! Every provider failure is converted to an [`AuthError`] with a fixed user-facing
//! message before it leaves the gateway.

pub mod auth;
pub mod models;
pub mod provider;

pub use auth::{
    AuthError, AuthErrorKind, AuthGateway, ConfigError, Credentials, IdentityConfig, Session,
    SessionState, SignUpCredentials, SignUpForm,
};
pub use models::UserIdentity;
pub use provider::{
    CognitoProvider, IdentityProvider, MemoryProvider, ProviderError, ResetPasswordStep,
    SignUpOutput, SignUpStep,
};
