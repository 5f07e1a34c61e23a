use chrono::{DateTime, Utc};
use http::header::{COOKIE, HeaderMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to every session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// Seconds
    pub max_age: u64,
    pub domain: Option<String>,
}

/// Renders a `Set-Cookie` value in the attribute order used by the `cookie`
/// serializer: `Max-Age`, `Domain`, `Path`, `Expires`, `HttpOnly`, `Secure`,
/// `SameSite`.
pub(crate) fn serialize_cookie(
    name: &str,
    value: &str,
    options: &CookieOptions,
    expires: Option<DateTime<Utc>>,
) -> String {
    let mut cookie = format!("{name}={}", encode_cookie_value(value));

    cookie.push_str(&format!("; Max-Age={}", options.max_age));
    if let Some(domain) = &options.domain {
        cookie.push_str(&format!("; Domain={domain}"));
    }
    cookie.push_str(&format!("; Path={}", options.path));
    if let Some(expires) = expires {
        cookie.push_str(&format!(
            "; Expires={}",
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        ));
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str(&format!("; SameSite={}", options.same_site.as_str()));

    cookie
}

/// Finds `name` among the `Cookie` headers.
///
/// Pairs without `=` and non-UTF-8 headers are skipped. The first occurrence
/// wins. Quoted values are unquoted and `%`-escapes decoded when they form
/// valid UTF-8, otherwise the raw value is returned.
pub(crate) fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| match header.to_str() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::debug!("Skipping non-UTF-8 cookie header: {e}");
                None
            }
        })
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.trim() != name {
                return None;
            }
            Some(decode_cookie_value(value.trim()))
        })
}

/// Percent-encodes like `encodeURIComponent`, so seal strings pass through as is.
fn encode_cookie_value(value: &str) -> String {
    const UNESCAPED: &[u8] = b"-_.!~*'()";

    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || UNESCAPED.contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn decode_cookie_value(value: &str) -> String {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    if !value.contains('%') {
        return value.to_string();
    }
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}
