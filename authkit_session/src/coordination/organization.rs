use http::HeaderMap;
use http::header::HeaderValue;

use super::authkit::AuthKit;
use super::errors::CoordinationError;
use crate::session::AuthKitAuth;

impl AuthKit {
    /// Refreshes the request's session into `organization_id`.
    ///
    /// Requires an authenticated user. Returns the `Set-Cookie` value carrying
    /// the re-scoped session.
    #[tracing::instrument(skip(self, headers, auth))]
    pub async fn switch_organization(
        &self,
        headers: &HeaderMap,
        auth: &AuthKitAuth,
        organization_id: &str,
    ) -> Result<HeaderValue, CoordinationError> {
        if !auth.is_authenticated() {
            return Err(CoordinationError::Unauthenticated.log());
        }

        let Some(session) = self.load_session(headers)? else {
            tracing::debug!("Authenticated context without a session cookie");
            return Err(CoordinationError::Unauthenticated.log());
        };

        let refreshed = self
            .provider()
            .refresh(&session, Some(organization_id))
            .await?;
        self.session_cookie(&refreshed)
    }
}
