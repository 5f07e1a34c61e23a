use std::sync::Mutex;

use async_trait::async_trait;
use authkit_session::{
    AccessTokenClaims, AuthKitProvider, AuthResult, AuthorizationUrlParams, ProviderError,
    Session,
};

use super::fixtures::test_session;

/// Stand-in for the WorkOS user management API.
///
/// Access tokens are `token-<n>[@<org>]`; every refresh bumps `n`. The
/// token `token-expired` is refreshed on authenticate.
#[derive(Default)]
pub struct MockProvider {
    pub logout_url: Option<String>,
    revoked: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn with_logout_url(url: &str) -> Self {
        Self {
            logout_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked().iter().any(|t| t == token)
    }
}

fn organization_of(token: &str) -> Option<String> {
    token.split_once('@').map(|(_, org)| org.to_string())
}

fn next_token(token: &str, organization_id: Option<&str>) -> String {
    let (base, current_org) = match token.split_once('@') {
        Some((base, org)) => (base, Some(org)),
        None => (token, None),
    };
    let n: u32 = base
        .strip_prefix("token-")
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    match organization_id.or(current_org) {
        Some(org) => format!("token-{}@{org}", n + 1),
        None => format!("token-{}", n + 1),
    }
}

#[async_trait]
impl AuthKitProvider for MockProvider {
    async fn authenticate(&self, session: &Session) -> Result<AuthResult, ProviderError> {
        if self.is_revoked(&session.access_token) {
            return Err(ProviderError::Unauthorized("Session has ended".to_string()));
        }

        let refreshed = if session.access_token == "token-expired" {
            Some(Session {
                access_token: next_token(&session.access_token, None),
                ..session.clone()
            })
        } else {
            None
        };
        let current = refreshed.as_ref().unwrap_or(session);

        Ok(AuthResult {
            user: current.user.clone(),
            claims: AccessTokenClaims {
                sid: "session_integration".to_string(),
                org_id: organization_of(&current.access_token),
                role: Some("admin".to_string()),
                permissions: Some(vec!["widgets:read".to_string(), "widgets:write".to_string()]),
                ..Default::default()
            },
            session_id: "session_integration".to_string(),
            impersonator: current.impersonator.clone(),
            access_token: current.access_token.clone(),
            refreshed,
        })
    }

    async fn authenticate_with_code(&self, code: &str) -> Result<Session, ProviderError> {
        match code {
            "valid-code" => Ok(test_session("token-1")),
            _ => Err(ProviderError::Unauthorized("Invalid authorization code".to_string())),
        }
    }

    async fn get_authorization_url(
        &self,
        params: AuthorizationUrlParams,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "https://api.workos.com/user_management/authorize?client_id=client_integration\
             &redirect_uri={}&response_type=code&provider=authkit&screen_hint={}",
            urlencoding::encode(&params.redirect_uri),
            params.screen_hint.as_str()
        ))
    }

    async fn refresh(
        &self,
        session: &Session,
        organization_id: Option<&str>,
    ) -> Result<Session, ProviderError> {
        Ok(Session {
            access_token: next_token(&session.access_token, organization_id),
            ..session.clone()
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<Option<String>, ProviderError> {
        if let Ok(mut revoked) = self.revoked.lock() {
            revoked.push(session.access_token.clone());
        }
        Ok(self.logout_url.clone())
    }
}
