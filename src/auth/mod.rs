//! Authentication module
//!
//! Supports: API tokens, password login header, Bearer tokens, and an
//! optional HTTP Basic layer in front of any of them.
//!
//! The `Authenticator` applies the configured credentials to every request
//! the HTTP client sends. Credentials are static for the life of a client.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, API_TOKEN_HEADER, PASSWORD_AUTH_HEADER};
pub use types::{AuthConfig, BasicCredentials};
