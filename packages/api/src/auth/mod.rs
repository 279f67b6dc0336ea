//! Authentication: credential forms, the gateway over the identity provider, and the
//! session state holder the UI observes.

mod config;
mod credentials;
mod error;
mod gateway;
mod session;

pub use config::{ConfigError, IdentityConfig};
pub use credentials::{
    validate_code, Credentials, SignUpCredentials, SignUpForm, MISSING_CODE, MISSING_FIELDS,
    PASSWORD_MISMATCH,
};
pub use error::{classify, AuthError, AuthErrorKind, PROVIDER_CODES};
pub use gateway::{AuthGateway, SIGN_IN_FAILED};
pub use session::{Session, SessionState};
