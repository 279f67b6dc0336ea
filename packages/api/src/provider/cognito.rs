//! # Cognito user-pool provider
//!
//! Talks to the Cognito Identity Provider JSON API directly over HTTPS. Every action is
//! a `POST` to the regional endpoint with an `X-Amz-Target` header naming the action
//! and an `application/x-amz-json-1.1` body. Only public app clients are supported
//! (no client secret), matching how a mobile app is registered with the pool.
//!
//! ## Actions used
//!
//! | Trait method | Action |
//! |--------------|--------|
//! | `sign_in` | `InitiateAuth` with `USER_PASSWORD_AUTH` |
//! | `sign_up` | `SignUp` with `email` and `name` attributes |
//! | `confirm_sign_up` | `ConfirmSignUp` |
//! | `reset_password` | `ForgotPassword` |
//! | `confirm_reset_password` | `ConfirmForgotPassword` |
//! | `current_user` | `GetUser`, after `InitiateAuth` with `REFRESH_TOKEN_AUTH` if the access token expired |
//! | `sign_out` | local token removal, then best-effort `RevokeToken` |
//!
//! ## Errors
//!
//! Failed actions answer with `{"__type": "...#NotAuthorizedException", "message": ...}`.
//! The namespace before `#` is stripped and the remainder becomes the structured code of
//! a [`ProviderError::Service`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    CodeDelivery, IdentityProvider, ProviderError, ResetPasswordStep, SignInOptions,
    SignInOutput, SignInStep, SignUpOutput, SignUpRequest, SignUpStep, TokenCache, Tokens,
};
use crate::auth::IdentityConfig;
use crate::models::UserIdentity;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";
const REFRESH_FLOW: &str = "REFRESH_TOKEN_AUTH";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: HashMap<&'a str, &'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpBody<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<AttributeType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_confirmed: bool,
    user_sub: Option<String>,
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeDeliveryDetails {
    destination: Option<String>,
    delivery_medium: Option<String>,
}

impl From<CodeDeliveryDetails> for CodeDelivery {
    fn from(details: CodeDeliveryDetails) -> Self {
        CodeDelivery {
            destination: details.destination.unwrap_or_default(),
            medium: details.delivery_medium.unwrap_or_else(|| "EMAIL".to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUpBody<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForgotPasswordBody<'a> {
    client_id: &'a str,
    username: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ForgotPasswordResponse {
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmForgotPasswordBody<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserBody<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<AttributeType>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RevokeTokenBody<'a> {
    token: &'a str,
    client_id: &'a str,
}

/// Actions that succeed with an empty object.
#[derive(Debug, Deserialize)]
struct Empty {}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "__type")]
    kind: String,
    #[serde(default, alias = "Message")]
    message: String,
}

/// Cognito user-pool client.
pub struct CognitoProvider {
    config: IdentityConfig,
    http: Client,
    tokens: Mutex<Option<Tokens>>,
    cache: Option<TokenCache>,
}

impl CognitoProvider {
    /// Create a provider for the configured pool, caching tokens where the config says.
    pub fn new(config: IdentityConfig) -> Self {
        let cache = config.session_cache.clone().map(TokenCache::new);
        Self {
            config,
            http: Client::new(),
            tokens: Mutex::new(None),
            cache,
        }
    }

    /// Post one action and decode its response.
    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(action, "calling user pool");

        let response = self
            .http
            .post(self.config.endpoint())
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|e| ProviderError::Unexpected(format!("{action}: {e}")));
        }

        let body: ServiceErrorBody = response
            .json()
            .await
            .map_err(|_| ProviderError::Unexpected(format!("{action}: HTTP {status}")))?;
        Err(ProviderError::service(
            error_code(&body.kind),
            body.message,
        ))
    }

    fn cached_tokens(&self) -> Option<Tokens> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        if tokens.is_none() {
            if let Some(cache) = &self.cache {
                match cache.load() {
                    Ok(loaded) => *tokens = loaded,
                    Err(e) => tracing::warn!("Ignoring session cache: {}", e),
                }
            }
        }
        tokens.clone()
    }

    fn save_tokens(&self, tokens: Tokens) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&tokens) {
                tracing::warn!("Failed to persist session: {}", e);
            }
        }
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    fn forget_tokens(&self) -> Option<Tokens> {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear() {
                tracing::warn!("Failed to clear session cache: {}", e);
            }
        }
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    async fn refresh(&self, tokens: Tokens) -> Result<Tokens, ProviderError> {
        let Some(refresh_token) = tokens.refresh_token.clone() else {
            self.forget_tokens();
            return Err(ProviderError::no_session());
        };

        let request = InitiateAuthRequest {
            auth_flow: REFRESH_FLOW,
            client_id: &self.config.client_id,
            auth_parameters: HashMap::from([("REFRESH_TOKEN", refresh_token.as_str())]),
        };

        let response: InitiateAuthResponse = match self.call("InitiateAuth", &request).await {
            Ok(response) => response,
            Err(e) => {
                // Only a rejected refresh token ends the session; keep it across outages
                if e.code() == Some("NotAuthorizedException") {
                    tracing::info!("Session refresh rejected, signing out locally: {}", e);
                    self.forget_tokens();
                } else {
                    tracing::warn!("Session refresh failed: {}", e);
                }
                return Err(e);
            }
        };

        let result = response.authentication_result.ok_or_else(|| {
            ProviderError::Unexpected("refresh returned no tokens".to_string())
        })?;

        let refreshed = Tokens {
            username: tokens.username,
            access_token: result.access_token,
            id_token: result.id_token.or(tokens.id_token),
            // Refresh responses do not rotate the refresh token.
            refresh_token: result.refresh_token.or(Some(refresh_token)),
            expires_at: Utc::now() + Duration::seconds(result.expires_in),
        };
        self.save_tokens(refreshed.clone());
        Ok(refreshed)
    }
}

/// `"com.amazonaws...#NotAuthorizedException"` → `"NotAuthorizedException"`.
fn error_code(kind: &str) -> &str {
    let code = kind.rsplit('#').next().unwrap_or(kind);
    code.split(':').next().unwrap_or(code)
}

fn attribute<'a>(attributes: &'a [AttributeType], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name == name)
        .map(|attr| attr.value.as_str())
}

#[async_trait]
impl IdentityProvider for CognitoProvider {
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        options: SignInOptions,
    ) -> Result<SignInOutput, ProviderError> {
        let request = InitiateAuthRequest {
            auth_flow: options.auth_flow.as_str(),
            client_id: &self.config.client_id,
            auth_parameters: HashMap::from([("USERNAME", username), ("PASSWORD", password)]),
        };
        let response: InitiateAuthResponse = self.call("InitiateAuth", &request).await?;

        if let Some(result) = response.authentication_result {
            self.save_tokens(Tokens {
                username: username.to_string(),
                access_token: result.access_token,
                id_token: result.id_token,
                refresh_token: result.refresh_token,
                expires_at: Utc::now() + Duration::seconds(result.expires_in),
            });
            return Ok(SignInOutput {
                is_signed_in: true,
                next_step: SignInStep::Done,
            });
        }

        match response.challenge_name {
            Some(challenge) => Ok(SignInOutput {
                is_signed_in: false,
                next_step: SignInStep::Challenge(challenge),
            }),
            None => Err(ProviderError::Unexpected(
                "InitiateAuth returned neither tokens nor a challenge".to_string(),
            )),
        }
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutput, ProviderError> {
        let body = SignUpBody {
            client_id: &self.config.client_id,
            username: &request.username,
            password: &request.password,
            user_attributes: vec![
                AttributeType {
                    name: "email".to_string(),
                    value: request.attributes.email.clone(),
                },
                AttributeType {
                    name: "name".to_string(),
                    value: request.attributes.name.clone(),
                },
            ],
        };
        let response: SignUpResponse = self.call("SignUp", &body).await?;

        let next_step = if response.user_confirmed {
            SignUpStep::Done
        } else {
            SignUpStep::ConfirmSignUp(response.code_delivery_details.map(CodeDelivery::from))
        };

        Ok(SignUpOutput {
            is_sign_up_complete: response.user_confirmed,
            user_id: response.user_sub,
            next_step,
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<bool, ProviderError> {
        let body = ConfirmSignUpBody {
            client_id: &self.config.client_id,
            username,
            confirmation_code: code,
        };
        let _: Empty = self.call("ConfirmSignUp", &body).await?;
        Ok(true)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let Some(tokens) = self.forget_tokens() else {
            return Ok(());
        };

        if let Some(refresh_token) = tokens.refresh_token.as_deref() {
            let body = RevokeTokenBody {
                token: refresh_token,
                client_id: &self.config.client_id,
            };
            if let Err(e) = self.call::<_, Empty>("RevokeToken", &body).await {
                tracing::warn!("Failed to revoke refresh token: {}", e);
            }
        }
        Ok(())
    }

    async fn reset_password(&self, username: &str) -> Result<ResetPasswordStep, ProviderError> {
        let body = ForgotPasswordBody {
            client_id: &self.config.client_id,
            username,
        };
        let response: ForgotPasswordResponse = self.call("ForgotPassword", &body).await?;
        Ok(ResetPasswordStep::ConfirmWithCode(
            response.code_delivery_details.map(CodeDelivery::from),
        ))
    }

    async fn confirm_reset_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let body = ConfirmForgotPasswordBody {
            client_id: &self.config.client_id,
            username,
            confirmation_code: code,
            password: new_password,
        };
        let _: Empty = self.call("ConfirmForgotPassword", &body).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<UserIdentity, ProviderError> {
        let tokens = self.cached_tokens().ok_or_else(ProviderError::no_session)?;
        let tokens = if tokens.is_expired(Utc::now()) {
            self.refresh(tokens).await?
        } else {
            tokens
        };

        let body = GetUserBody {
            access_token: &tokens.access_token,
        };
        let response: GetUserResponse = match self.call("GetUser", &body).await {
            Ok(response) => response,
            Err(e) => {
                if e.code() == Some("NotAuthorizedException") {
                    // Revoked or otherwise dead session.
                    self.forget_tokens();
                }
                return Err(e);
            }
        };

        let attrs = &response.user_attributes;
        Ok(UserIdentity {
            user_id: attribute(attrs, "sub")
                .unwrap_or(&response.username)
                .to_string(),
            username: response.username.clone(),
            email: attribute(attrs, "email").map(str::to_string),
            name: attribute(attrs, "name").map(str::to_string),
        })
    }
}
