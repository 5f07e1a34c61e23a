use std::sync::Arc;

use authkit_session::{
    AuthKit, AuthKitAuth, CallbackParams, CoordinationError, SignInOptions, decode_state,
};
use http::header::LOCATION;
use http::{HeaderMap, Response, StatusCode};

use crate::common::{MockProvider, headers_with_cookie, test_config, test_session};

fn authkit_with(provider: MockProvider) -> (AuthKit, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let authkit = AuthKit::new(test_config(), provider.clone()).expect("valid config");
    (authkit, provider)
}

fn state_param(url: &str) -> String {
    url::Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

/// Sign-in URL → callback → authenticated request → organization switch →
/// sign-out → rejected request.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let (authkit, provider) =
        authkit_with(MockProvider::with_logout_url("https://api.workos.com/logout"));

    // Sign-in URL carries the return path
    let url = authkit
        .get_sign_in_url(SignInOptions::return_to("/settings"))
        .await
        .unwrap();
    let state = state_param(&url);
    assert_eq!(
        decode_state(&state).unwrap().return_pathname.as_deref(),
        Some("/settings")
    );

    // Callback exchanges the code and sets the cookie
    let outcome = authkit
        .handle_callback(CallbackParams {
            code: Some("valid-code".to_string()),
            state: Some(state),
            error: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome.return_pathname, "/settings");
    assert_eq!(outcome.user.email, "grace@example.com");

    // The browser sends the cookie back
    let headers = headers_with_cookie(&outcome.set_cookie);
    let auth = authkit.authenticate_request(&headers).await.unwrap();
    assert!(auth.auth.is_authenticated());
    assert_eq!(auth.auth.access_token.as_deref(), Some("token-1"));
    assert_eq!(auth.auth.organization_id, None);
    assert_eq!(auth.auth.permissions, vec!["widgets:read", "widgets:write"]);
    assert!(auth.set_cookie.is_none());

    // Switch into an organization
    let switched = authkit
        .switch_organization(&headers, &auth.auth, "org_acme")
        .await
        .unwrap();
    let headers = headers_with_cookie(&switched);
    let auth = authkit.authenticate_request(&headers).await.unwrap().auth;
    assert_eq!(auth.organization_id.as_deref(), Some("org_acme"));
    assert_eq!(auth.access_token.as_deref(), Some("token-2@org_acme"));

    // Refresh keeps the organization
    let refreshed = authkit.refresh_session(&headers).await.unwrap().unwrap();
    let headers = headers_with_cookie(&refreshed);
    let auth = authkit.authenticate_request(&headers).await.unwrap().auth;
    assert_eq!(auth.access_token.as_deref(), Some("token-3@org_acme"));

    // Sign out clears the cookie and redirects to the logout URL
    let home = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, "/")
        .body(())
        .unwrap();
    let signed_out = authkit.sign_out(&headers, &home).await.unwrap();
    assert_eq!(
        signed_out.headers().get(LOCATION).unwrap(),
        "https://api.workos.com/logout"
    );
    assert_eq!(provider.revoked(), vec!["token-3@org_acme"]);

    // A replayed cookie is rejected upstream
    let err = authkit.authenticate_request(&headers).await.unwrap_err();
    assert!(err.is_invalid_session());
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_transparently() {
    let (authkit, _) = authkit_with(MockProvider::default());
    let sealed = authkit.seal_session(&test_session("token-expired")).unwrap();
    let cookie = authkit.storage().session_cookie(&sealed).unwrap();

    let outcome = authkit
        .authenticate_request(&headers_with_cookie(&cookie))
        .await
        .unwrap();
    assert_eq!(outcome.auth.access_token.as_deref(), Some("token-1"));

    let rewritten = outcome.set_cookie.expect("refreshed session cookie");
    let next = authkit
        .authenticate_request(&headers_with_cookie(&rewritten))
        .await
        .unwrap();
    assert_eq!(next.auth.access_token.as_deref(), Some("token-1"));
    assert!(next.set_cookie.is_none());
}

#[tokio::test]
async fn test_unauthenticated_request_cannot_switch_organization() {
    let (authkit, _) = authkit_with(MockProvider::default());
    let outcome = authkit.authenticate_request(&HeaderMap::new()).await.unwrap();
    assert_eq!(outcome.auth, AuthKitAuth::empty());

    let result = authkit
        .switch_organization(&HeaderMap::new(), &outcome.auth, "org_acme")
        .await;
    assert_eq!(result.unwrap_err(), CoordinationError::Unauthenticated);
}

#[tokio::test]
async fn test_callback_with_rejected_code() {
    let (authkit, _) = authkit_with(MockProvider::default());
    let result = authkit
        .handle_callback(CallbackParams {
            code: Some("stolen-code".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(CoordinationError::Upstream(_))));
}

#[test]
fn test_short_cookie_password_is_rejected_at_construction() {
    let mut config = test_config();
    config.cookie_password = "too-short".to_string();
    let result = AuthKit::new(config, Arc::new(MockProvider::default()));
    assert!(matches!(result, Err(CoordinationError::Config(_))));
}
