//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::{AuthConfig, BasicCredentials};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::RequestBuilder;

/// Header carrying app API tokens
pub const API_TOKEN_HEADER: &str = "X-Cybozu-API-Token";

/// Header carrying base64 `login:password`
pub const PASSWORD_AUTH_HEADER: &str = "X-Cybozu-Authorization";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone, Default)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Optional Basic layer
    basic: Option<BasicCredentials>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            basic: None,
        }
    }

    /// Add HTTP Basic credentials on top of the main auth
    #[must_use]
    pub fn with_basic(mut self, basic: Option<BasicCredentials>) -> Self {
        self.basic = basic;
        self
    }

    /// Apply authentication to a request builder
    ///
    /// Basic credentials and a bearer token both use `Authorization`;
    /// `ClientConfig::validate` rejects that pairing.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        let req = match &self.basic {
            Some(basic) => req.basic_auth(&basic.username, Some(&basic.password)),
            None => req,
        };

        match &self.config {
            AuthConfig::None => req,

            AuthConfig::ApiToken { tokens } => req.header(API_TOKEN_HEADER, tokens.join(",")),

            AuthConfig::Password { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                req.header(PASSWORD_AUTH_HEADER, encoded)
            }

            AuthConfig::Bearer { token } => req.bearer_auth(token),
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.config {
            AuthConfig::None => "none",
            AuthConfig::ApiToken { .. } => "api_token",
            AuthConfig::Password { .. } => "password",
            AuthConfig::Bearer { .. } => "bearer",
        };
        f.debug_struct("Authenticator")
            .field("kind", &kind)
            .field("has_basic", &self.basic.is_some())
            .finish()
    }
}
