use http::header::{HeaderValue, LOCATION};
use http::{HeaderMap, Response, StatusCode};

use super::authkit::AuthKit;
use super::errors::CoordinationError;
use crate::storage::StorageError;

impl AuthKit {
    /// Ends the session and returns a copy of `response` that clears the cookie.
    ///
    /// The session is invalidated upstream when the request carries one. If the
    /// provider returns a logout URL the copy redirects there. The cookie is
    /// cleared even when the stored session is unreadable or the upstream call
    /// fails.
    #[tracing::instrument(skip_all)]
    pub async fn sign_out<B: Clone>(
        &self,
        headers: &HeaderMap,
        response: &Response<B>,
    ) -> Result<Response<B>, CoordinationError> {
        let session = match self.load_session(headers) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!("Clearing unreadable session cookie: {}", e);
                None
            }
        };

        let logout_url = match &session {
            Some(session) => match self.provider().sign_out(session).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Failed to invalidate session upstream: {}", e);
                    None
                }
            },
            None => None,
        };

        let mut cleared = self.storage().clear_session(response)?;

        if let Some(url) = logout_url {
            let location = HeaderValue::from_str(&url)
                .map_err(|e| StorageError::Header(format!("Invalid logout URL: {e}")))?;
            *cleared.status_mut() = StatusCode::FOUND;
            cleared.headers_mut().insert(LOCATION, location);
            tracing::debug!("Redirecting to logout URL");
        }

        Ok(cleared)
    }
}
