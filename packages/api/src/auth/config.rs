//! Identity provider configuration from environment variables.

use std::path::PathBuf;

use thiserror::Error;

/// Each setting is looked up under its plain name first, then with the
/// `EXPO_PUBLIC_` prefix used by the older client builds.
const PUBLIC_PREFIX: &str = "EXPO_PUBLIC_";

pub const USER_POOL_ID_VAR: &str = "COGNITO_USER_POOL_ID";
pub const CLIENT_ID_VAR: &str = "COGNITO_CLIENT_ID";
pub const REGION_VAR: &str = "COGNITO_REGION";
pub const ENDPOINT_VAR: &str = "COGNITO_ENDPOINT";
pub const SESSION_CACHE_VAR: &str = "DIMLY_SESSION_CACHE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid user pool id {0:?}: expected <region>_<id>")]
    InvalidPoolId(String),
}

/// User pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_pool_id: String,
    pub client_id: String,
    pub region: String,
    /// Overrides the regional endpoint, e.g. for a local user-pool emulator.
    pub endpoint: Option<String>,
    /// Where issued tokens are cached; `None` keeps them in memory only.
    pub session_cache: Option<PathBuf>,
}

impl IdentityConfig {
    /// Create the user pool config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("{PUBLIC_PREFIX}{key}")))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let user_pool_id = get(USER_POOL_ID_VAR).ok_or(ConfigError::Missing(USER_POOL_ID_VAR))?;
        let client_id = get(CLIENT_ID_VAR).ok_or(ConfigError::Missing(CLIENT_ID_VAR))?;

        let region = match get(REGION_VAR) {
            Some(region) => region,
            None => region_from_pool_id(&user_pool_id)?,
        };

        let session_cache = get(SESSION_CACHE_VAR)
            .map(PathBuf::from)
            .or_else(crate::provider::TokenCache::default_path);

        Ok(Self {
            user_pool_id,
            client_id,
            region,
            endpoint: get(ENDPOINT_VAR),
            session_cache,
        })
    }

    /// URL every user-pool action is posted to.
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://cognito-idp.{}.amazonaws.com/", self.region),
        }
    }
}

fn region_from_pool_id(pool_id: &str) -> Result<String, ConfigError> {
    match pool_id.split_once('_') {
        Some((region, id)) if !region.is_empty() && !id.is_empty() => Ok(region.to_string()),
        _ => Err(ConfigError::InvalidPoolId(pool_id.to_string())),
    }
}
