//! Credential discovery and OAuth access tokens for the Earth Engine REST API.
//!
//! Discovery order:
//! 1. a service-account key from `EE_SERVICE_ACCOUNT_KEY` (inline JSON) or
//!    `EE_SERVICE_ACCOUNT_KEY_FILE`,
//! 2. only in development, the refresh token written by the local
//!    `earthengine authenticate` flow,
//! 3. otherwise [`AuthError::NoCredentials`].
//!
//! Browser builds skip discovery and hand a ready access token to
//! [`TokenProvider::with_access_token`].

use crate::error::AuthError;
use crate::settings::Settings;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;

pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for every token.
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/earthengine https://www.googleapis.com/auth/cloud-platform";

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a service-account key file that signing needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// A stored user refresh token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

fn default_token_uri() -> String {
    TOKEN_URI.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
    /// A token obtained elsewhere, e.g. the browser implicit flow.
    AccessToken(String),
}

impl Credentials {
    /// Find credentials according to the discovery order above.
    pub fn discover(settings: &Settings) -> Result<Self, AuthError> {
        if let Some(inline) = &settings.service_account_key {
            info!("Using service account key from EE_SERVICE_ACCOUNT_KEY");
            return parse_service_account(inline, "EE_SERVICE_ACCOUNT_KEY");
        }
        if let Some(path) = &settings.service_account_key_file {
            info!("Using service account key file {}", path.display());
            let contents = read_credential_file(path)?;
            return parse_service_account(&contents, &path.display().to_string());
        }
        if settings.is_development() {
            if let Some(path) = &settings.user_credentials_file {
                if path.exists() {
                    info!("Using local user credentials {}", path.display());
                    let contents = read_credential_file(path)?;
                    return parse_authorized_user(&contents, &path.display().to_string());
                }
                debug!("No local credentials at {}", path.display());
            }
        }
        Err(AuthError::NoCredentials)
    }
}

fn read_credential_file(path: &Path) -> Result<String, AuthError> {
    std::fs::read_to_string(path).map_err(|e| AuthError::InvalidCredentials {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_service_account(json: &str, source: &str) -> Result<Credentials, AuthError> {
    serde_json::from_str::<ServiceAccountKey>(json)
        .map(Credentials::ServiceAccount)
        .map_err(|e| AuthError::InvalidCredentials {
            path: source.to_string(),
            reason: e.to_string(),
        })
}

pub fn parse_authorized_user(json: &str, source: &str) -> Result<Credentials, AuthError> {
    serde_json::from_str::<AuthorizedUser>(json)
        .map(Credentials::AuthorizedUser)
        .map_err(|e| AuthError::InvalidCredentials {
            path: source.to_string(),
            reason: e.to_string(),
        })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) < expires_at,
            None => true,
        }
    }
}

/// Hands out bearer tokens, exchanging credentials only when the cached one
/// is about to expire. Failed exchanges are not retried.
#[derive(Debug)]
pub struct TokenProvider {
    credentials: Credentials,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(credentials: Credentials, http: reqwest::Client) -> Self {
        let cached = match &credentials {
            Credentials::AccessToken(token) => Some(CachedToken {
                value: token.clone(),
                expires_at: None,
            }),
            _ => None,
        };
        Self {
            credentials,
            http,
            cached: Mutex::new(cached),
        }
    }

    pub fn with_access_token(token: &str, http: reqwest::Client) -> Self {
        Self::new(Credentials::AccessToken(token.to_string()), http)
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached_token(Utc::now()) {
            return Ok(token);
        }
        let response = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::AuthorizedUser(user) => self.refresh_user_token(user).await?,
            Credentials::ServiceAccount(key) => self.exchange_service_account(key).await?,
        };
        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        debug!("Obtained access token, expires at {:?}", expires_at);
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(CachedToken {
                value: response.access_token.clone(),
                expires_at,
            });
        }
        Ok(response.access_token)
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        let cached = self.cached.lock().ok()?;
        cached
            .as_ref()
            .filter(|token| token.is_fresh(now))
            .map(|token| token.value.clone())
    }

    async fn refresh_user_token(&self, user: &AuthorizedUser) -> Result<TokenResponse, AuthError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
            ("refresh_token", user.refresh_token.as_str()),
        ];
        self.post_token_form(TOKEN_URI, &form).await
    }

    #[cfg(all(feature = "service-account", not(target_arch = "wasm32")))]
    async fn exchange_service_account(
        &self,
        key: &ServiceAccountKey,
    ) -> Result<TokenResponse, AuthError> {
        let assertion = sign_assertion(key, Utc::now())?;
        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];
        self.post_token_form(&key.token_uri, &form).await
    }

    #[cfg(not(all(feature = "service-account", not(target_arch = "wasm32"))))]
    async fn exchange_service_account(
        &self,
        _key: &ServiceAccountKey,
    ) -> Result<TokenResponse, AuthError> {
        Err(AuthError::ServiceAccountUnsupported)
    }

    async fn post_token_form(
        &self,
        uri: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(uri)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::TokenExchange(format!("{status}: {body}")));
        }
        serde_json::from_str(&body).map_err(|e| AuthError::TokenExchange(e.to_string()))
    }
}

#[cfg(all(feature = "service-account", not(target_arch = "wasm32")))]
#[derive(Debug, serde::Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// RS256-signed JWT assertion for the jwt-bearer grant, valid for one hour.
#[cfg(all(feature = "service-account", not(target_arch = "wasm32")))]
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, AuthError> {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let iat = now.timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat,
        exp: iat + 3600,
    };
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AuthError::TokenExchange(format!("invalid private key: {e}")))?;
    encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
        .map_err(|e| AuthError::TokenExchange(e.to_string()))
}
