//! Router for the AuthKit endpoints

use std::collections::HashMap;

use axum::{
    Extension, Form, Json, Router,
    body::Body,
    extract::Query,
    http::{HeaderMap, StatusCode, header::LOCATION, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::header::HeaderValue;
use serde::Deserialize;
use serde_json::json;

use authkit_session::{AuthKit, CallbackParams, CoordinationError};

use super::config::{AUTHKIT_ERROR_URL, AUTHKIT_SIGN_OUT_REDIRECT};
use super::error::IntoResponseError;
use super::middleware::redirect_found;
use super::session::AuthContext;

/// Create a router for the AuthKit endpoints
///
/// Mount it under a prefix of your choice (e.g. `/auth`) inside the
/// [`crate::authkit_handle`] middleware:
/// - `GET  /callback` completes the OAuth round trip
/// - `GET|POST /sign-out` ends the session
/// - `POST /switch-organization` re-scopes the session to an organization
/// - `POST /refresh` refreshes the session
/// - `GET  /error` reports a failed sign-in
pub fn authkit_router() -> Router {
    Router::new()
        .route("/callback", get(callback))
        .route("/sign-out", get(sign_out).post(sign_out))
        .route("/switch-organization", post(switch_organization))
        .route("/refresh", post(refresh))
        .route("/error", get(auth_error))
}

fn error_redirect(message: &str) -> Response {
    let location = format!(
        "{}?message={}",
        AUTHKIT_ERROR_URL.as_str(),
        urlencoding::encode(message)
    );
    redirect_found(&location)
}

async fn callback(
    Extension(authkit): Extension<AuthKit>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, (StatusCode, String)> {
    if let Some(error) = &params.error {
        tracing::error!("OAuth error: {}", error);
        return Ok(error_redirect(error));
    }

    match authkit.handle_callback(params).await {
        Ok(outcome) => {
            let mut response = redirect_found(&outcome.return_pathname);
            response
                .headers_mut()
                .append(SET_COOKIE, outcome.set_cookie);
            Ok(response)
        }
        Err(CoordinationError::MissingCode) => {
            Err(CoordinationError::MissingCode).into_response_error()
        }
        Err(e) => {
            tracing::error!("Authentication error: {}", e);
            Ok(error_redirect("Authentication failed"))
        }
    }
}

async fn sign_out(
    Extension(authkit): Extension<AuthKit>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let home = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, AUTHKIT_SIGN_OUT_REDIRECT.as_str())
        .body(())
        .into_response_error()?;

    let response = authkit.sign_out(&headers, &home).await.into_response_error()?;
    Ok(response.map(|()| Body::empty()))
}

#[derive(Debug, Deserialize)]
struct SwitchOrganizationForm {
    organization_id: String,
    /// Local path to land on afterwards (default `/`)
    return_to: Option<String>,
}

async fn switch_organization(
    Extension(authkit): Extension<AuthKit>,
    AuthContext(auth): AuthContext,
    headers: HeaderMap,
    Form(form): Form<SwitchOrganizationForm>,
) -> Result<Response, (StatusCode, String)> {
    let set_cookie = authkit
        .switch_organization(&headers, &auth, &form.organization_id)
        .await
        .into_response_error()?;

    let target = form
        .return_to
        .as_deref()
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or("/");

    let mut response = redirect_found(target);
    response.headers_mut().append(SET_COOKIE, set_cookie);
    Ok(response)
}

async fn refresh(
    Extension(authkit): Extension<AuthKit>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let refreshed: Option<HeaderValue> = authkit
        .refresh_session(&headers)
        .await
        .into_response_error()?;

    let response = match refreshed {
        Some(set_cookie) => (
            StatusCode::OK,
            [(SET_COOKIE, set_cookie)],
            Json(json!({ "refreshed": true })),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "refreshed": false })),
        )
            .into_response(),
    };
    Ok(response)
}

async fn auth_error(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    let message = params
        .get("message")
        .cloned()
        .unwrap_or_else(|| "Authentication failed".to_string());
    (StatusCode::UNAUTHORIZED, format!("Sign-in failed: {message}"))
}
