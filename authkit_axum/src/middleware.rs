use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::header::{LOCATION, SET_COOKIE};

use authkit_session::{AuthKit, AuthKitAuth, AuthOutcome, CoordinationError, SignInOptions};

/// Callback invoked when the request hook fails to resolve a session
pub type OnError = Arc<dyn Fn(&CoordinationError) + Send + Sync>;

#[derive(Clone, Default)]
pub struct AuthKitHandleOptions {
    /// Log each request and its resolved user
    pub debug: bool,
    pub on_error: Option<OnError>,
}

impl std::fmt::Debug for AuthKitHandleOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKitHandleOptions")
            .field("debug", &self.debug)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// State of the [`authkit_handle`] middleware.
///
/// ```no_run
/// # use authkit_axum::{AuthKitHandle, authkit_handle};
/// # fn app(authkit: authkit_session::AuthKit) -> axum::Router {
/// axum::Router::new().layer(axum::middleware::from_fn_with_state(
///     AuthKitHandle::new(authkit),
///     authkit_handle,
/// ))
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AuthKitHandle {
    pub authkit: AuthKit,
    pub options: AuthKitHandleOptions,
}

impl AuthKitHandle {
    pub fn new(authkit: AuthKit) -> Self {
        Self {
            authkit,
            options: AuthKitHandleOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AuthKitHandleOptions) -> Self {
        self.options = options;
        self
    }
}

/// Request hook: resolves the session cookie into an [`AuthKitAuth`] stored
/// in the request extensions, and appends a refreshed session cookie to the
/// response.
///
/// Any failure degrades to the empty auth state; the request always proceeds.
pub async fn authkit_handle(
    State(handle): State<AuthKitHandle>,
    mut req: Request,
    next: Next,
) -> Response {
    let options = &handle.options;
    if options.debug {
        tracing::info!("[AuthKit] Processing request: {}", req.uri().path());
    }

    let outcome = match handle.authkit.authenticate_request(req.headers()).await {
        Ok(outcome) => {
            if options.debug {
                if let Some(user) = &outcome.auth.user {
                    tracing::info!("[AuthKit] User authenticated: {}", user.email);
                }
            }
            outcome
        }
        Err(err) => {
            if options.debug {
                tracing::error!("[AuthKit] Error in handle: {}", err);
            } else {
                tracing::debug!("Falling back to empty auth state: {}", err);
            }
            if let Some(on_error) = &options.on_error {
                on_error(&err);
            }
            AuthOutcome::default()
        }
    };

    req.extensions_mut().insert(outcome.auth);
    req.extensions_mut().insert(handle.authkit.clone());

    let mut response = next.run(req).await;
    if let Some(cookie) = outcome.set_cookie {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

/// Guard for routes that need a signed-in user.
///
/// Unauthenticated requests are redirected to the hosted sign-in page with
/// the current path carried in the OAuth state. Must run inside
/// [`authkit_handle`].
pub async fn with_auth(req: Request, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<AuthKitAuth>()
        .is_some_and(AuthKitAuth::is_authenticated);
    if authenticated {
        return next.run(req).await;
    }

    let Some(authkit) = req.extensions().get::<AuthKit>().cloned() else {
        tracing::error!("with_auth requires the authkit_handle middleware");
        return (StatusCode::INTERNAL_SERVER_ERROR, "AuthKit is not configured").into_response();
    };

    let return_to = req.uri().path().to_string();
    match sign_in_redirect_url(&authkit, &return_to).await {
        Some(url) => redirect_found(&url),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build sign-in URL",
        )
            .into_response(),
    }
}

pub(crate) async fn sign_in_redirect_url(authkit: &AuthKit, return_to: &str) -> Option<String> {
    match authkit
        .get_sign_in_url(SignInOptions::return_to(return_to))
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::error!("Failed to build sign-in URL: {}", e);
            None
        }
    }
}

/// 302 Found to `location`
pub(crate) fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
