use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn,
    response::{Html, IntoResponse},
    routing::get,
};

use authkit_axum::{AuthContext, AuthUser, with_auth};

pub(super) fn router() -> Router {
    Router::new()
        .route("/account", get(account))
        .route(
            "/dashboard",
            get(dashboard).route_layer(from_fn(with_auth)),
        )
}

#[derive(Template)]
#[template(path = "account.html")]
struct AccountTemplate<'a> {
    email: &'a str,
    user_id: &'a str,
    organization: &'a str,
}

// Having user as an argument sends anonymous GETs to the sign-in page
async fn account(user: AuthUser) -> impl IntoResponse {
    let template = AccountTemplate {
        email: &user.user.email,
        user_id: &user.user.id,
        organization: user.auth.organization_id.as_deref().unwrap_or("(none)"),
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    auth_json: String,
}

// Guarded by the with_auth middleware
async fn dashboard(AuthContext(auth): AuthContext) -> impl IntoResponse {
    let template = DashboardTemplate {
        auth_json: serde_json::to_string_pretty(&auth).unwrap_or_default(),
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
