//! Configuration for the AuthKit session layer
//!
//! A single [`AuthKitConfig`] is built at startup, validated once, and then
//! passed to [`crate::AuthKit::new`]. It is never mutated afterwards; a new
//! policy means a new `AuthKit`.

use std::env;

use thiserror::Error;

use crate::encryption::MIN_PASSWORD_LENGTH;

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "wos-session";

/// Default session cookie lifetime: 400 days, in seconds
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 400 * 24 * 60 * 60;

const ENV_CLIENT_ID: &str = "WORKOS_CLIENT_ID";
const ENV_API_KEY: &str = "WORKOS_API_KEY";
const ENV_REDIRECT_URI: &str = "WORKOS_REDIRECT_URI";
const ENV_COOKIE_PASSWORD: &str = "WORKOS_COOKIE_PASSWORD";
const ENV_COOKIE_NAME: &str = "WORKOS_COOKIE_NAME";
const ENV_COOKIE_DOMAIN: &str = "WORKOS_COOKIE_DOMAIN";
const ENV_COOKIE_MAX_AGE: &str = "WORKOS_COOKIE_MAX_AGE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error(
        "cookie_password must be at least {min} characters long. \
         Generate a secure password using: openssl rand -base64 24"
    )]
    PasswordTooShort { min: usize },

    #[error("Invalid WORKOS_COOKIE_MAX_AGE: {0}")]
    InvalidMaxAge(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthKitConfig {
    /// WorkOS client ID
    pub client_id: String,
    /// WorkOS API key
    pub api_key: String,
    /// OAuth redirect URI
    pub redirect_uri: String,
    /// Cookie encryption password (min 32 UTF-16 code units)
    pub cookie_password: String,
    /// Session cookie name (default: `wos-session`)
    pub cookie_name: Option<String>,
    /// Cookie domain restriction
    pub cookie_domain: Option<String>,
    /// Cookie max age in seconds (default: 400 days)
    pub cookie_max_age: Option<u64>,
}

impl std::fmt::Debug for AuthKitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKitConfig")
            .field("client_id", &self.client_id)
            .field("api_key", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("cookie_password", &"[redacted]")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_max_age", &self.cookie_max_age)
            .finish()
    }
}

impl AuthKitConfig {
    pub fn new(
        client_id: impl Into<String>,
        api_key: impl Into<String>,
        redirect_uri: impl Into<String>,
        cookie_password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
            redirect_uri: redirect_uri.into(),
            cookie_password: cookie_password.into(),
            cookie_name: None,
            cookie_domain: None,
            cookie_max_age: None,
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    pub fn with_cookie_max_age(mut self, seconds: u64) -> Self {
        self.cookie_max_age = Some(seconds);
        self
    }

    /// Reads the configuration from `WORKOS_*` environment variables and validates it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let cookie_max_age = match non_empty(ENV_COOKIE_MAX_AGE) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| ConfigError::InvalidMaxAge(format!("{raw:?}: {e}")))?,
            ),
            None => None,
        };

        let config = Self {
            client_id: non_empty(ENV_CLIENT_ID).unwrap_or_default(),
            api_key: non_empty(ENV_API_KEY).unwrap_or_default(),
            redirect_uri: non_empty(ENV_REDIRECT_URI).unwrap_or_default(),
            cookie_password: non_empty(ENV_COOKIE_PASSWORD).unwrap_or_default(),
            cookie_name: non_empty(ENV_COOKIE_NAME),
            cookie_domain: non_empty(ENV_COOKIE_DOMAIN),
            cookie_max_age,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks required settings and the password floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = [
            (ENV_CLIENT_ID, &self.client_id),
            (ENV_API_KEY, &self.api_key),
            (ENV_REDIRECT_URI, &self.redirect_uri),
            (ENV_COOKIE_PASSWORD, &self.cookie_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            tracing::error!("Missing required configuration: {}", missing.join(", "));
            return Err(ConfigError::Missing(missing));
        }

        if self.cookie_password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
            return Err(ConfigError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        Ok(())
    }

    pub fn cookie_name(&self) -> &str {
        self.cookie_name.as_deref().unwrap_or(DEFAULT_COOKIE_NAME)
    }

    pub fn cookie_max_age(&self) -> u64 {
        self.cookie_max_age.unwrap_or(DEFAULT_COOKIE_MAX_AGE)
    }
}
