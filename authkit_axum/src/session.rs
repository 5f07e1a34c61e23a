use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{Method, StatusCode, request::Parts};

use authkit_session::{AuthKit, AuthKitAuth, User};

use super::middleware::{redirect_found, sign_in_redirect_url};

pub struct AuthRedirect {
    method: Method,
    sign_in_url: Option<String>,
}

impl AuthRedirect {
    fn new(method: Method, sign_in_url: Option<String>) -> Self {
        Self {
            method,
            sign_in_url,
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        match self.sign_in_url {
            Some(url) if self.method == Method::GET => {
                tracing::debug!("Redirecting to sign-in");
                redirect_found(&url)
            }
            _ => {
                tracing::debug!("Unauthorized");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
        }
    }
}

/// The per-request auth state set by [`crate::authkit_handle`].
///
/// Always succeeds; it is empty when the request is unauthenticated.
#[derive(Clone, Debug, Default)]
pub struct AuthContext(pub AuthKitAuth);

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthKitAuth>() {
            Some(auth) => Ok(AuthContext(auth.clone())),
            None => {
                tracing::debug!("No auth state on request; is authkit_handle installed?");
                Ok(AuthContext::default())
            }
        }
    }
}

/// Signed-in user, available as an Axum extractor
///
/// GET requests without a user are redirected to the hosted sign-in page
/// (returning to the current path afterwards); other methods get 401.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use authkit_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.user.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    /// Full auth state: organization, role, permissions and session id
    pub auth: AuthKitAuth,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthKitAuth>()
            .cloned()
            .unwrap_or_default();

        if let Some(user) = auth.user.clone() {
            return Ok(AuthUser { user, auth });
        }

        let method = parts.method.clone();
        let authkit = parts.extensions.get::<AuthKit>().cloned();
        let sign_in_url = match authkit {
            Some(authkit) if method == Method::GET => {
                sign_in_redirect_url(&authkit, parts.uri.path()).await
            }
            _ => None,
        };
        Err(AuthRedirect::new(method, sign_in_url))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthKitAuth>()
            .cloned()
            .unwrap_or_default();
        Ok(auth.user.clone().map(|user| AuthUser { user, auth }))
    }
}
