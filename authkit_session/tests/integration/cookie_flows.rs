use authkit_session::{
    AuthKitConfig, CookieSessionStorage, SealError, SealVersion, parse_seal, seal, unseal,
};
use http::header::LOCATION;
use http::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::common::{request_with_cookie, set_cookies};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    user_id: String,
    role: String,
}

fn storage_with(password: &str) -> CookieSessionStorage {
    let config = AuthKitConfig::new(
        "client_123",
        "sk_test_123",
        "http://localhost:3000/callback",
        password,
    );
    CookieSessionStorage::new(&config)
}

/// Seal a record, store it on a response, send the cookie back on a new
/// request, read it and unseal it.
#[test]
fn test_seal_store_read_unseal_round_trip() {
    let password = "a".repeat(32);
    let storage = storage_with(&password);
    let record = Record {
        user_id: "u_1".to_string(),
        role: "admin".to_string(),
    };

    let sealed = seal(&record, &password, 0).unwrap();
    assert!(sealed.starts_with("Fe26.2*1*"));
    assert!(sealed.ends_with("~2"));

    let response = storage.save_session(&Response::new(()), &sealed).unwrap();
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("wos-session=Fe26.2*1*"));
    assert!(cookies[0].ends_with("; Max-Age=34560000; Path=/; HttpOnly; Secure; SameSite=Lax"));

    let request = request_with_cookie(&cookies[0]);
    let read_back = storage.get_session(&request).unwrap();
    assert_eq!(read_back, sealed);

    let unsealed: Record = unseal(&read_back, &password).unwrap();
    assert_eq!(unsealed, record);
}

#[test]
fn test_cleared_cookie_reads_back_empty() {
    let storage = storage_with(&"a".repeat(32));
    let redirect = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, "/")
        .body(())
        .unwrap();

    let cleared = storage.clear_session(&redirect).unwrap();
    assert_eq!(cleared.status(), StatusCode::FOUND);
    assert_eq!(cleared.headers().get(LOCATION).unwrap(), "/");

    let cookies = set_cookies(&cleared);
    assert_eq!(
        cookies,
        vec![
            "wos-session=; Max-Age=0; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; \
             HttpOnly; Secure; SameSite=Lax"
        ]
    );

    // A browser that ignored the expiry would send back an empty value
    let request = request_with_cookie(&cookies[0]);
    assert_eq!(storage.get_session(&request), Some(String::new()));
    assert!(set_cookies(&redirect).is_empty());
}

#[test]
fn test_cookie_from_another_password_is_rejected() {
    let storage = storage_with(&"a".repeat(32));
    let sealed = seal(&json!({ "userId": "u_1" }), &"b".repeat(32), 0).unwrap();
    let response = storage.save_session(&Response::new(()), &sealed).unwrap();
    let request = request_with_cookie(&set_cookies(&response)[0]);

    let read_back = storage.get_session(&request).unwrap();
    let result = unseal::<Value>(&read_back, &"a".repeat(32));
    assert_eq!(
        result,
        Err(SealError::Integrity("Bad hmac value".to_string()))
    );
}

#[test]
fn test_unrelated_cookies_do_not_interfere() {
    let storage = storage_with(&"a".repeat(32));
    let request = Request::builder()
        .header("cookie", "_ga=GA1.2.3; broken; wos-session=Fe26.2*1*v~2; theme=\"dark\"")
        .body(())
        .unwrap();
    let seal = storage.get_session(&request).unwrap();
    assert_eq!(parse_seal(&seal), ("Fe26.2*1*v", SealVersion::Current));
}

#[test]
fn test_configured_cookie_policy() {
    let config = AuthKitConfig::new(
        "client_123",
        "sk_test_123",
        "http://localhost:3000/callback",
        "a".repeat(32),
    )
    .with_cookie_name("app-session")
    .with_cookie_domain("example.com")
    .with_cookie_max_age(86_400);
    let storage = CookieSessionStorage::new(&config);

    let response = storage.save_session(&Response::new(()), "v~2").unwrap();
    assert_eq!(
        set_cookies(&response),
        vec!["app-session=v~2; Max-Age=86400; Domain=example.com; Path=/; HttpOnly; Secure; SameSite=Lax"]
    );

    let cleared = storage.clear_session(&Response::new(())).unwrap();
    let cookie = &set_cookies(&cleared)[0];
    assert!(cookie.starts_with("app-session=; Max-Age=0; Domain=example.com;"));
}
