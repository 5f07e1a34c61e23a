use url::Url;

use super::authkit::AuthKit;
use super::errors::CoordinationError;
use super::state::encode_state;
use crate::session::{AuthorizationUrlParams, ProviderError, ScreenHint};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInOptions {
    pub organization_id: Option<String>,
    pub login_hint: Option<String>,
    /// Path to land on after the callback completes
    pub return_to: Option<String>,
}

impl SignInOptions {
    pub fn return_to(path: impl Into<String>) -> Self {
        Self {
            return_to: Some(path.into()),
            ..Default::default()
        }
    }
}

impl AuthKit {
    /// Hosted sign-in URL.
    pub async fn get_sign_in_url(&self, options: SignInOptions) -> Result<String, CoordinationError> {
        self.authorization_url(ScreenHint::SignIn, options).await
    }

    /// Hosted sign-up URL.
    pub async fn get_sign_up_url(&self, options: SignInOptions) -> Result<String, CoordinationError> {
        self.authorization_url(ScreenHint::SignUp, options).await
    }

    #[tracing::instrument(skip(self))]
    async fn authorization_url(
        &self,
        screen_hint: ScreenHint,
        options: SignInOptions,
    ) -> Result<String, CoordinationError> {
        let params = AuthorizationUrlParams {
            screen_hint,
            redirect_uri: self.config().redirect_uri.clone(),
            organization_id: options.organization_id,
            login_hint: options.login_hint,
        };
        let url = self.provider().get_authorization_url(params).await?;

        match options.return_to {
            Some(return_to) => with_return_state(&url, &return_to),
            None => Ok(url),
        }
    }
}

/// Replaces the `state` query parameter of `url` with the encoded return path.
fn with_return_state(url: &str, return_to: &str) -> Result<String, CoordinationError> {
    let mut url = Url::parse(url)
        .map_err(|e| ProviderError::InvalidResponse(format!("Invalid authorization URL: {e}")))?;
    let state = encode_state(return_to)?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "state")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("state", &state);

    tracing::debug!("Authorization URL carries return path {}", return_to);
    Ok(url.into())
}
