//! Request-level AuthKit flows built on the storage adapter, the seal codec
//! and the provider capability.

mod authkit;
mod callback;
mod errors;
mod organization;
mod sign_in;
mod sign_out;
mod state;

pub use authkit::{AuthKit, AuthOutcome};
pub use callback::{CallbackOutcome, CallbackParams};
pub use errors::CoordinationError;
pub use sign_in::SignInOptions;
pub use state::{ReturnState, decode_state, encode_state};
