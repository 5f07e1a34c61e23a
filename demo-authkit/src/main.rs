use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use authkit_axum::authkit_session::{AuthKit, AuthKitConfig, SignInOptions};
use authkit_axum::{AuthContext, AuthKitHandle, AuthKitHandleOptions, authkit_handle, authkit_router};

mod dev_provider;
mod protected;
mod server;

use dev_provider::DevProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_authkit");

    let config = AuthKitConfig::from_env()?;
    let base_url =
        std::env::var("DEMO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let port: u16 = std::env::var("DEMO_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let authkit = AuthKit::new(config, Arc::new(DevProvider::new(&base_url)))?;
    let handle = AuthKitHandle::new(authkit).with_options(AuthKitHandleOptions {
        debug: cfg!(debug_assertions),
        on_error: None,
    });

    let app = Router::new()
        .route("/", get(index))
        .merge(protected::router())
        .merge(dev_provider::router())
        .nest("/auth", authkit_router())
        .layer(from_fn_with_state(handle, authkit_handle));

    server::serve(port, app).await?;
    Ok(())
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    name: Option<&'a str>,
    sign_in_url: &'a str,
    sign_up_url: &'a str,
}

fn render(template: IndexTemplate<'_>) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn index(
    Extension(authkit): Extension<AuthKit>,
    AuthContext(auth): AuthContext,
) -> Response {
    if let Some(user) = authkit.get_user(&auth) {
        return render(IndexTemplate {
            name: Some(user.first_name.as_deref().unwrap_or(&user.email)),
            sign_in_url: "",
            sign_up_url: "",
        });
    }

    let sign_in = authkit.get_sign_in_url(SignInOptions::return_to("/account"));
    let sign_up = authkit.get_sign_up_url(SignInOptions::default());
    match (sign_in.await, sign_up.await) {
        (Ok(sign_in), Ok(sign_up)) => render(IndexTemplate {
            name: None,
            sign_in_url: &sign_in,
            sign_up_url: &sign_up,
        }),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to build sign-in URLs: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "AuthKit is unavailable").into_response()
        }
    }
}
