use async_trait::async_trait;

use super::errors::ProviderError;
use super::types::{AuthResult, AuthorizationUrlParams, Session};

/// The external session/authentication service (the WorkOS user management API).
///
/// Token verification, code exchange and session invalidation live behind
/// this trait so the cookie and sealing layers can run against any
/// implementation, including test doubles.
#[async_trait]
pub trait AuthKitProvider: Send + Sync {
    /// Validates the session's access token, refreshing it when expired.
    ///
    /// A refreshed session is returned in [`AuthResult::refreshed`].
    async fn authenticate(&self, session: &Session) -> Result<AuthResult, ProviderError>;

    /// Exchanges an OAuth authorization code for a new session.
    async fn authenticate_with_code(&self, code: &str) -> Result<Session, ProviderError>;

    /// Builds a hosted sign-in or sign-up URL.
    async fn get_authorization_url(
        &self,
        params: AuthorizationUrlParams,
    ) -> Result<String, ProviderError>;

    /// Refreshes the session, optionally into another organization.
    async fn refresh(
        &self,
        session: &Session,
        organization_id: Option<&str>,
    ) -> Result<Session, ProviderError>;

    /// Invalidates the session upstream and returns the logout URL, if any.
    async fn sign_out(&self, session: &Session) -> Result<Option<String>, ProviderError>;
}
