use std::sync::Arc;

use http::HeaderMap;
use http::header::HeaderValue;

use super::errors::CoordinationError;
use crate::config::AuthKitConfig;
use crate::encryption::{seal, unseal};
use crate::session::{AuthKitAuth, AuthKitProvider, Session, User};
use crate::storage::CookieSessionStorage;

/// Session cookies are bounded by the cookie `Max-Age`, not by the seal.
const SESSION_SEAL_TTL_SECONDS: u64 = 0;

/// Entry point tying the configuration, the cookie storage adapter, the
/// seal codec and the external provider together.
///
/// Built once at startup and shared; clones are cheap.
#[derive(Clone)]
pub struct AuthKit {
    config: Arc<AuthKitConfig>,
    storage: CookieSessionStorage,
    provider: Arc<dyn AuthKitProvider>,
}

impl std::fmt::Debug for AuthKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKit")
            .field("config", &self.config)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

/// Identity resolved for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthOutcome {
    pub auth: AuthKitAuth,
    /// `Set-Cookie` value to append when the provider refreshed the session
    pub set_cookie: Option<HeaderValue>,
}

impl AuthKit {
    /// Validates `config` and binds it to `provider`.
    pub fn new(
        config: AuthKitConfig,
        provider: Arc<dyn AuthKitProvider>,
    ) -> Result<Self, CoordinationError> {
        config.validate()?;
        let storage = CookieSessionStorage::new(&config);
        tracing::debug!(
            "AuthKit configured with cookie '{}' (max-age {}s)",
            storage.cookie_name(),
            config.cookie_max_age()
        );
        Ok(Self {
            config: Arc::new(config),
            storage,
            provider,
        })
    }

    pub fn config(&self) -> &AuthKitConfig {
        &self.config
    }

    pub fn storage(&self) -> &CookieSessionStorage {
        &self.storage
    }

    pub(crate) fn provider(&self) -> &dyn AuthKitProvider {
        self.provider.as_ref()
    }

    /// Seals `session` with the configured cookie password.
    pub fn seal_session(&self, session: &Session) -> Result<String, CoordinationError> {
        Ok(seal(
            session,
            &self.config.cookie_password,
            SESSION_SEAL_TTL_SECONDS,
        )?)
    }

    /// Seals `session` and renders the `Set-Cookie` value that stores it.
    pub fn session_cookie(&self, session: &Session) -> Result<HeaderValue, CoordinationError> {
        let sealed = self.seal_session(session)?;
        Ok(self.storage.session_cookie(&sealed)?)
    }

    /// Reads and unseals the session cookie. `Ok(None)` when there is none.
    pub(crate) fn load_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Session>, CoordinationError> {
        let Some(sealed) = self.storage.get_session_from_headers(headers) else {
            return Ok(None);
        };
        let session: Session = unseal(&sealed, &self.config.cookie_password)?;
        Ok(Some(session))
    }

    /// Resolves the identity carried by the request's session cookie.
    ///
    /// A request without a session cookie yields the empty auth state. When
    /// the provider refreshed the session, the new cookie is returned for the
    /// caller to append to its response.
    #[tracing::instrument(skip_all)]
    pub async fn authenticate_request(
        &self,
        headers: &HeaderMap,
    ) -> Result<AuthOutcome, CoordinationError> {
        let Some(session) = self.load_session(headers)? else {
            tracing::debug!("No session cookie; request is unauthenticated");
            return Ok(AuthOutcome::default());
        };

        let result = self.provider.authenticate(&session).await?;

        let set_cookie = match &result.refreshed {
            Some(refreshed) => {
                tracing::debug!("Session refreshed for user {}", result.user.id);
                Some(self.session_cookie(refreshed)?)
            }
            None => None,
        };

        tracing::debug!("Authenticated user {}", result.user.id);
        Ok(AuthOutcome {
            auth: AuthKitAuth::from(&result),
            set_cookie,
        })
    }

    /// Refreshes the request's session, keeping its current organization.
    ///
    /// Returns the new `Set-Cookie` value, or `None` when the request carries
    /// no session.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<HeaderValue>, CoordinationError> {
        let Some(session) = self.load_session(headers)? else {
            tracing::debug!("No session to refresh");
            return Ok(None);
        };
        let refreshed = self.provider.refresh(&session, None).await?;
        Ok(Some(self.session_cookie(&refreshed)?))
    }

    pub fn get_user<'a>(&self, auth: &'a AuthKitAuth) -> Option<&'a User> {
        auth.user.as_ref()
    }
}
