//! Authentication module
//!
//! Spreedly authenticates every request with HTTP Basic credentials: the
//! API token as the user name and the literal `X` as the password.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, TOKEN_PASSWORD};
