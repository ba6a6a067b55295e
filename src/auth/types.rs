//! Auth configuration types
//!
//! These types represent the runtime auth configuration after the client
//! configuration file and environment overrides have been merged.

use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// One or more app API tokens
    ApiToken {
        /// Tokens, sent comma-joined in a single header
        tokens: Vec<String>,
    },

    /// User login with password
    Password {
        /// Login name
        username: String,
        /// Password
        password: String,
    },

    /// Bearer token (OAuth access token)
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Create API token auth from one token
    pub fn api_token(token: impl Into<String>) -> Self {
        Self::ApiToken {
            tokens: vec![token.into()],
        }
    }

    /// Create password auth
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check that the configured credentials are not blank
    pub fn has_credentials(&self) -> bool {
        match self {
            Self::None => false,
            Self::ApiToken { tokens } => {
                !tokens.is_empty() && tokens.iter().all(|t| !t.trim().is_empty())
            }
            Self::Password { username, password } => !username.is_empty() && !password.is_empty(),
            Self::Bearer { token } => !token.trim().is_empty(),
        }
    }
}

/// HTTP Basic credentials for a proxy or Basic-protected domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCredentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl BasicCredentials {
    /// Create basic credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
