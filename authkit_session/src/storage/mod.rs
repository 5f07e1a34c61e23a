mod cookie;
mod errors;
mod session_storage;

pub use cookie::{CookieOptions, SameSite};
pub use errors::StorageError;
pub use session_storage::CookieSessionStorage;
