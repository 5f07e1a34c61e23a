use chrono::{DateTime, Utc};
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use http::{Request, Response};

use super::cookie::{CookieOptions, SameSite, find_cookie, serialize_cookie};
use super::errors::StorageError;
use crate::config::AuthKitConfig;

/// Reads and writes the sealed session cookie.
///
/// The attribute policy is fixed at construction: `Path=/`, `HttpOnly`,
/// `Secure`, `SameSite=Lax`, plus the configured max-age and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSessionStorage {
    cookie_name: String,
    options: CookieOptions,
}

impl CookieSessionStorage {
    pub fn new(config: &AuthKitConfig) -> Self {
        Self {
            cookie_name: config.cookie_name().to_string(),
            options: CookieOptions {
                path: "/".to_string(),
                http_only: true,
                secure: true,
                same_site: SameSite::Lax,
                max_age: config.cookie_max_age(),
                domain: config.cookie_domain.clone(),
            },
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn cookie_options(&self) -> &CookieOptions {
        &self.options
    }

    /// Returns the raw seal carried by the request, if any.
    pub fn get_session<B>(&self, request: &Request<B>) -> Option<String> {
        self.get_session_from_headers(request.headers())
    }

    pub fn get_session_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let session = find_cookie(headers, &self.cookie_name);
        if session.is_none() {
            tracing::debug!("No session cookie '{}' found in cookies", self.cookie_name);
        }
        session
    }

    /// Returns a copy of `response` with a `Set-Cookie` header carrying `seal`.
    pub fn save_session<B: Clone>(
        &self,
        response: &Response<B>,
        seal: &str,
    ) -> Result<Response<B>, StorageError> {
        let cookie = self.session_cookie(seal)?;
        Ok(with_set_cookie(response, cookie))
    }

    /// Returns a copy of `response` that makes the browser drop the session cookie.
    pub fn clear_session<B: Clone>(
        &self,
        response: &Response<B>,
    ) -> Result<Response<B>, StorageError> {
        let cookie = self.clear_session_cookie()?;
        Ok(with_set_cookie(response, cookie))
    }

    /// `Set-Cookie` value storing `seal` under the configured policy.
    pub fn session_cookie(&self, seal: &str) -> Result<HeaderValue, StorageError> {
        let cookie = serialize_cookie(&self.cookie_name, seal, &self.options, None);
        header_value(cookie)
    }

    /// `Set-Cookie` value with an empty value, `Max-Age=0` and an expiry in the past.
    pub fn clear_session_cookie(&self) -> Result<HeaderValue, StorageError> {
        let options = CookieOptions {
            max_age: 0,
            ..self.options.clone()
        };
        let cookie = serialize_cookie(
            &self.cookie_name,
            "",
            &options,
            Some(DateTime::<Utc>::UNIX_EPOCH),
        );
        header_value(cookie)
    }
}

fn header_value(cookie: String) -> Result<HeaderValue, StorageError> {
    HeaderValue::from_str(&cookie)
        .map_err(|e| StorageError::Header(format!("Failed to parse cookie: {e}")))
}

/// Copy-on-write: the caller's response is left untouched.
fn with_set_cookie<B: Clone>(response: &Response<B>, cookie: HeaderValue) -> Response<B> {
    let mut copy = Response::new(response.body().clone());
    *copy.status_mut() = response.status();
    *copy.version_mut() = response.version();
    *copy.headers_mut() = response.headers().clone();
    *copy.extensions_mut() = response.extensions().clone();

    copy.headers_mut().append(SET_COOKIE, cookie);
    copy
}
