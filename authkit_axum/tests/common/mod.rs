use std::sync::Arc;

use async_trait::async_trait;
use authkit_axum::authkit_session::{
    AccessTokenClaims, AuthKit, AuthKitConfig, AuthKitProvider, AuthResult,
    AuthorizationUrlParams, ProviderError, Session, User,
};
use authkit_axum::{
    AuthContext, AuthKitHandle, AuthKitHandleOptions, AuthUser, authkit_handle, authkit_router,
    with_auth,
};
use axum::{
    Json, Router,
    body::Body,
    middleware::{from_fn, from_fn_with_state},
    response::Response,
    routing::get,
};
use http::header::SET_COOKIE;

pub const LOGOUT_URL: &str = "https://api.workos.com/user_management/sessions/logout?session_id=s_1";

/// Access tokens are `tok:<organization id>`; `tok-expired` is refreshed on
/// authenticate and `tok-revoked` is rejected.
pub struct StubProvider;

fn user() -> User {
    serde_json::from_value(serde_json::json!({
        "object": "user",
        "id": "user_stub",
        "email": "linus@example.com",
        "emailVerified": true,
        "firstName": "Linus"
    }))
    .expect("valid user")
}

pub fn session(access_token: &str) -> Session {
    Session {
        access_token: access_token.to_string(),
        refresh_token: "rt_stub".to_string(),
        user: user(),
        impersonator: None,
    }
}

#[async_trait]
impl AuthKitProvider for StubProvider {
    async fn authenticate(&self, session: &Session) -> Result<AuthResult, ProviderError> {
        if session.access_token == "tok-revoked" {
            return Err(ProviderError::Unauthorized("revoked".to_string()));
        }
        let refreshed = (session.access_token == "tok-expired").then(|| Session {
            access_token: "tok:".to_string(),
            ..session.clone()
        });
        let current = refreshed.as_ref().unwrap_or(session);
        let org_id = current
            .access_token
            .strip_prefix("tok:")
            .filter(|org| !org.is_empty())
            .map(str::to_string);
        Ok(AuthResult {
            user: current.user.clone(),
            claims: AccessTokenClaims {
                sid: "s_1".to_string(),
                org_id,
                role: Some("member".to_string()),
                ..Default::default()
            },
            session_id: "s_1".to_string(),
            impersonator: None,
            access_token: current.access_token.clone(),
            refreshed,
        })
    }

    async fn authenticate_with_code(&self, code: &str) -> Result<Session, ProviderError> {
        match code {
            "good" => Ok(session("tok:")),
            _ => Err(ProviderError::Unauthorized("invalid_grant".to_string())),
        }
    }

    async fn get_authorization_url(
        &self,
        params: AuthorizationUrlParams,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "https://auth.example.com/user_management/authorize?client_id=client_stub&screen_hint={}&state=opaque",
            params.screen_hint.as_str()
        ))
    }

    async fn refresh(
        &self,
        session: &Session,
        organization_id: Option<&str>,
    ) -> Result<Session, ProviderError> {
        let current = session.access_token.strip_prefix("tok:").unwrap_or_default();
        Ok(Session {
            access_token: format!("tok:{}", organization_id.unwrap_or(current)),
            ..session.clone()
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<Option<String>, ProviderError> {
        Ok(Some(LOGOUT_URL.to_string()))
    }
}

pub fn create_authkit() -> AuthKit {
    let config = AuthKitConfig::new(
        "client_stub",
        "sk_test_stub",
        "http://localhost:3000/auth/callback",
        "axum-test-cookie-password-0123456789abcdef",
    );
    AuthKit::new(config, Arc::new(StubProvider)).expect("valid config")
}

pub fn create_test_app(authkit: AuthKit, options: AuthKitHandleOptions) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(|| async { "dashboard" }))
        .route_layer(from_fn(with_auth));

    Router::new()
        .route(
            "/",
            get(|AuthContext(auth): AuthContext| async move { Json(auth) }),
        )
        .route(
            "/me",
            get(|user: AuthUser| async move { user.user.email })
                .post(|user: AuthUser| async move { user.user.email }),
        )
        .merge(protected)
        .nest("/auth", authkit_router())
        .layer(from_fn_with_state(
            AuthKitHandle::new(authkit).with_options(options),
            authkit_handle,
        ))
}

/// `Cookie` header value for `access_token` sealed by `authkit`
pub fn cookie_for(authkit: &AuthKit, access_token: &str) -> String {
    let set_cookie = authkit
        .session_cookie(&session(access_token))
        .expect("sealable session");
    cookie_pair(set_cookie.to_str().expect("ascii"))
}

pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> http::Request<Body> {
    request("GET", uri, cookie)
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}
