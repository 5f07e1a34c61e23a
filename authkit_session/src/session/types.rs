use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// WorkOS user record as stored in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Fields this crate does not model, carried through reseals unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The WorkOS Dashboard user impersonating the session user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impersonator {
    pub email: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The record sealed into the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonator: Option<Impersonator>,
}

/// Claims carried by a WorkOS access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Session ID
    pub sid: String,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub entitlements: Option<Vec<String>>,
    #[serde(default)]
    pub feature_flags: Option<Vec<String>>,
}

/// Outcome of validating a session with the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResult {
    pub user: User,
    pub claims: AccessTokenClaims,
    pub session_id: String,
    pub impersonator: Option<Impersonator>,
    pub access_token: String,
    /// Set when the provider had to refresh the session; it must be written back.
    pub refreshed: Option<Session>,
}

/// Per-request identity context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthKitAuth {
    pub user: Option<User>,
    pub organization_id: Option<String>,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub session_id: Option<String>,
    pub impersonator: Option<Impersonator>,
    pub access_token: Option<String>,
}

impl AuthKitAuth {
    /// Unauthenticated state
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl From<&AuthResult> for AuthKitAuth {
    fn from(result: &AuthResult) -> Self {
        Self {
            user: Some(result.user.clone()),
            organization_id: result.claims.org_id.clone(),
            role: result.claims.role.clone(),
            permissions: result.claims.permissions.clone().unwrap_or_default(),
            session_id: Some(result.session_id.clone()),
            impersonator: result.impersonator.clone(),
            access_token: Some(result.access_token.clone()),
        }
    }
}

impl From<AuthResult> for AuthKitAuth {
    fn from(result: AuthResult) -> Self {
        Self {
            user: Some(result.user),
            organization_id: result.claims.org_id,
            role: result.claims.role,
            permissions: result.claims.permissions.unwrap_or_default(),
            session_id: Some(result.session_id),
            impersonator: result.impersonator,
            access_token: Some(result.access_token),
        }
    }
}

/// Which hosted AuthKit screen an authorization URL opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenHint {
    SignIn,
    SignUp,
}

impl ScreenHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenHint::SignIn => "sign-in",
            ScreenHint::SignUp => "sign-up",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationUrlParams {
    pub screen_hint: ScreenHint,
    pub redirect_uri: String,
    pub organization_id: Option<String>,
    pub login_hint: Option<String>,
}
