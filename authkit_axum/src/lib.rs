//! authkit-axum - Axum integration for WorkOS AuthKit cookie sessions
//!
//! Install [`authkit_handle`] as the outermost layer to resolve the session
//! cookie on every request, guard routes with [`with_auth`] or the
//! [`AuthUser`] extractor, and mount [`authkit_router`] for the callback,
//! sign-out, organization switch and refresh endpoints.

mod config;
mod error;
mod middleware;
mod router;
mod session;

pub use config::{AUTHKIT_ERROR_URL, AUTHKIT_SIGN_OUT_REDIRECT};
pub use error::IntoResponseError;
pub use middleware::{AuthKitHandle, AuthKitHandleOptions, OnError, authkit_handle, with_auth};
pub use router::authkit_router;
pub use session::{AuthContext, AuthRedirect, AuthUser};

// Re-export the core crate
pub use authkit_session;
