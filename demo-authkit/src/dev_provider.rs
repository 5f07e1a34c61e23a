//! A local stand-in for the WorkOS API so the demo runs without credentials.
//!
//! `/dev/authorize` plays the hosted AuthKit page: it signs everyone in as
//! the same user and bounces straight back to the callback.

use std::collections::HashMap;

use async_trait::async_trait;
use authkit_axum::authkit_session::{
    AccessTokenClaims, AuthKitProvider, AuthResult, AuthorizationUrlParams, ProviderError,
    Session, User,
};
use axum::{
    Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

const DEV_CODE: &str = "dev-code";
const TOKEN_PREFIX: &str = "dev-access:";

pub(crate) struct DevProvider {
    base_url: String,
}

impl DevProvider {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn dev_user() -> Result<User, ProviderError> {
    serde_json::from_value(serde_json::json!({
        "object": "user",
        "id": "user_dev",
        "email": "dev@example.com",
        "emailVerified": true,
        "firstName": "Dev",
        "lastName": "User"
    }))
    .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

fn token_for(organization_id: Option<&str>) -> String {
    format!("{TOKEN_PREFIX}{}", organization_id.unwrap_or_default())
}

#[async_trait]
impl AuthKitProvider for DevProvider {
    async fn authenticate(&self, session: &Session) -> Result<AuthResult, ProviderError> {
        let Some(org) = session.access_token.strip_prefix(TOKEN_PREFIX) else {
            return Err(ProviderError::Unauthorized("Unknown access token".to_string()));
        };
        let org_id = (!org.is_empty()).then(|| org.to_string());

        Ok(AuthResult {
            user: session.user.clone(),
            claims: AccessTokenClaims {
                sid: "session_dev".to_string(),
                role: Some(if org_id.is_some() { "admin" } else { "member" }.to_string()),
                permissions: Some(vec!["demo:read".to_string()]),
                org_id,
                ..Default::default()
            },
            session_id: "session_dev".to_string(),
            impersonator: session.impersonator.clone(),
            access_token: session.access_token.clone(),
            refreshed: None,
        })
    }

    async fn authenticate_with_code(&self, code: &str) -> Result<Session, ProviderError> {
        if code != DEV_CODE {
            return Err(ProviderError::Unauthorized("Invalid authorization code".to_string()));
        }
        Ok(Session {
            access_token: token_for(None),
            refresh_token: "dev-refresh".to_string(),
            user: dev_user()?,
            impersonator: None,
        })
    }

    async fn get_authorization_url(
        &self,
        params: AuthorizationUrlParams,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "{}/dev/authorize?redirect_uri={}&screen_hint={}",
            self.base_url,
            urlencoding::encode(&params.redirect_uri),
            params.screen_hint.as_str()
        ))
    }

    async fn refresh(
        &self,
        session: &Session,
        organization_id: Option<&str>,
    ) -> Result<Session, ProviderError> {
        let current = session
            .access_token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|org| !org.is_empty());
        Ok(Session {
            access_token: token_for(organization_id.or(current)),
            ..session.clone()
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}

pub(crate) fn router() -> Router {
    Router::new().route("/dev/authorize", get(authorize))
}

async fn authorize(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(redirect_uri) = params.get("redirect_uri") else {
        return (StatusCode::BAD_REQUEST, "Missing redirect_uri").into_response();
    };
    let mut target = format!("{redirect_uri}?code={DEV_CODE}");
    if let Some(state) = params.get("state") {
        target.push_str(&format!("&state={}", urlencoding::encode(state)));
    }
    tracing::debug!("Dev sign-in, redirecting to {}", target);
    Redirect::to(&target).into_response()
}
