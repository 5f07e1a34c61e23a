use http::header::HeaderValue;
use serde::Deserialize;

use super::authkit::AuthKit;
use super::errors::CoordinationError;
use super::state::{ReturnState, decode_state, safe_return_pathname};
use crate::session::User;

/// Query parameters of the OAuth callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackOutcome {
    /// Where to redirect the browser; `/` unless the state names a local path
    pub return_pathname: String,
    /// `Set-Cookie` value carrying the new session
    pub set_cookie: HeaderValue,
    pub user: User,
}

impl AuthKit {
    /// Completes the OAuth round trip: exchanges the code for a session and
    /// seals it into a new cookie.
    #[tracing::instrument(skip_all)]
    pub async fn handle_callback(
        &self,
        params: CallbackParams,
    ) -> Result<CallbackOutcome, CoordinationError> {
        if let Some(error) = params.error {
            return Err(CoordinationError::OAuth(error).log());
        }

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or(CoordinationError::MissingCode)?;

        let return_state = match params.state.as_deref() {
            Some(state) if !state.is_empty() => decode_state(state)?,
            _ => ReturnState::default(),
        };

        let session = self.provider().authenticate_with_code(&code).await?;
        let set_cookie = self.session_cookie(&session)?;

        tracing::debug!("Signed in user {}", session.user.id);
        Ok(CallbackOutcome {
            return_pathname: safe_return_pathname(&return_state),
            set_cookie,
            user: session.user,
        })
    }
}
