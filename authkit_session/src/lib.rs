//! authkit-session - WorkOS AuthKit session cookies on plain `http` types
//!
//! This crate reads and writes the sealed AuthKit session cookie, seals
//! session records in the iron `Fe26.2` format with a `~2` version suffix,
//! and coordinates sign-in, callback, organization switching, refresh and
//! sign-out against an [`AuthKitProvider`].

mod config;
mod coordination;
mod encryption;
mod session;
mod storage;
mod utils;


pub use config::{AuthKitConfig, ConfigError, DEFAULT_COOKIE_MAX_AGE, DEFAULT_COOKIE_NAME};

pub use coordination::{
    AuthKit, AuthOutcome, CallbackOutcome, CallbackParams, CoordinationError, ReturnState,
    SignInOptions, decode_state, encode_state,
};

pub use encryption::{
    CURRENT_SEAL_VERSION, MIN_PASSWORD_LENGTH, SealError, SealVersion, VERSION_DELIMITER,
    parse_seal, seal, unseal,
};

pub use session::{
    AccessTokenClaims, AuthKitAuth, AuthKitProvider, AuthResult, AuthorizationUrlParams,
    Impersonator, ProviderError, ScreenHint, Session, User,
};

pub use storage::{CookieOptions, CookieSessionStorage, SameSite, StorageError};

pub use utils::UtilError;
