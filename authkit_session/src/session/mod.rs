mod errors;
mod provider;
mod types;

pub use errors::ProviderError;
pub use provider::AuthKitProvider;
pub use types::{
    AccessTokenClaims, AuthKitAuth, AuthResult, AuthorizationUrlParams, Impersonator, ScreenHint,
    Session, User,
};
