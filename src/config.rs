//! Client configuration
//!
//! `ClientConfig` is loaded from a YAML or JSON file, optionally patched
//! from environment variables, validated, and then turned into a ready
//! [`RecordFetcher`].

use crate::auth::{AuthConfig, Authenticator, BasicCredentials};
use crate::engine::{FetchSettings, RecordFetcher};
use crate::error::{Error, Result};
use crate::fetcher::RestFetcher;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::types::{RecordId, ID_FIELD, MAX_OFFSET, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Longest accepted cursor idle lifetime, in seconds
pub const MAX_CURSOR_IDLE_SECONDS: i64 = 24 * 60 * 60;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "BULK_RECORDS_BASE_URL";

/// Environment variable overriding `app`
pub const ENV_APP: &str = "BULK_RECORDS_APP";

/// Environment variable holding API tokens (comma-separated)
pub const ENV_API_TOKEN: &str = "BULK_RECORDS_API_TOKEN";

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// No authentication
    #[default]
    None,
    /// App API tokens
    ApiToken {
        /// Tokens
        tokens: Vec<String>,
    },
    /// Login name and password
    Password {
        /// Login name
        username: String,
        /// Password
        password: String,
    },
    /// OAuth bearer token
    Bearer {
        /// Access token
        token: String,
    },
}

impl From<AuthDefinition> for AuthConfig {
    fn from(def: AuthDefinition) -> Self {
        match def {
            AuthDefinition::None => AuthConfig::None,
            AuthDefinition::ApiToken { tokens } => AuthConfig::ApiToken { tokens },
            AuthDefinition::Password { username, password } => {
                AuthConfig::Password { username, password }
            }
            AuthDefinition::Bearer { token } => AuthConfig::Bearer { token },
        }
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Platform base URL, e.g. `https://example.cybozu.com`
    #[serde(default)]
    pub base_url: String,

    /// Default app for queries that name none
    #[serde(default)]
    pub app: Option<String>,

    /// Authentication
    #[serde(default)]
    pub auth: AuthDefinition,

    /// HTTP Basic credentials in front of the platform
    #[serde(default)]
    pub basic_auth: Option<BasicCredentials>,

    /// Records per request
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Client-side rate limit; omitted means unlimited
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Idle lifetime of server-side cursors in seconds
    #[serde(default = "default_cursor_idle")]
    pub cursor_idle_seconds: i64,

    /// Largest offset accepted by offset pagination
    #[serde(default = "default_max_offset")]
    pub max_offset: u64,

    /// Primary key field code
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_timeout() -> u64 {
    30
}

fn default_cursor_idle() -> i64 {
    600
}

fn default_max_offset() -> u64 {
    MAX_OFFSET
}

fn default_id_field() -> String {
    ID_FIELD.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            app: None,
            auth: AuthDefinition::None,
            basic_auth: None,
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
            rate_limit: None,
            cursor_idle_seconds: default_cursor_idle(),
            max_offset: default_max_offset(),
            id_field: default_id_field(),
        }
    }
}

impl ClientConfig {
    /// Create a config for a base URL and API token
    pub fn with_api_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: AuthDefinition::ApiToken {
                tokens: vec![token.into()],
            },
            ..Default::default()
        }
    }

    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a lookup function
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(app) = lookup(ENV_APP) {
            self.app = Some(app);
        }
        if let Some(tokens) = lookup(ENV_API_TOKEN) {
            self.auth = AuthDefinition::ApiToken {
                tokens: tokens.split(',').map(|t| t.trim().to_string()).collect(),
            };
        }
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.cursor_idle_seconds <= 0 || self.cursor_idle_seconds > MAX_CURSOR_IDLE_SECONDS {
            return Err(Error::config(format!(
                "cursor_idle_seconds must be between 1 and {MAX_CURSOR_IDLE_SECONDS}, got {}",
                self.cursor_idle_seconds
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be positive"));
        }

        let auth = self.auth_config();
        if !auth.has_credentials() {
            return Err(Error::missing_field("auth"));
        }
        // Both would be sent as `Authorization`
        if self.basic_auth.is_some() && matches!(auth, AuthConfig::Bearer { .. }) {
            return Err(Error::config(
                "basic_auth cannot be combined with bearer auth",
            ));
        }
        Ok(())
    }

    /// Runtime auth configuration
    pub fn auth_config(&self) -> AuthConfig {
        self.auth.clone().into()
    }

    /// HTTP client configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_seconds));
        match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        }
        .build()
    }

    /// Paginator settings
    pub fn fetch_settings(&self) -> Result<FetchSettings> {
        let cursor_idle_lifetime = chrono::Duration::try_seconds(self.cursor_idle_seconds)
            .ok_or_else(|| {
                Error::config(format!(
                    "cursor_idle_seconds out of range: {}",
                    self.cursor_idle_seconds
                ))
            })?;

        Ok(FetchSettings {
            page_size: self.page_size,
            id_field: self.id_field.clone(),
            start_after: RecordId::ZERO,
            cursor_idle_lifetime,
            max_offset: self.max_offset,
        })
    }

    /// Validate and build a record fetcher
    pub fn build_fetcher(&self) -> Result<RecordFetcher> {
        self.validate()?;

        let authenticator =
            Authenticator::new(self.auth_config()).with_basic(self.basic_auth.clone());
        let http = HttpClient::with_auth(self.http_config(), authenticator)?;
        let pages = RestFetcher::new(http).with_id_field(&self.id_field);

        Ok(RecordFetcher::new(pages)
            .with_default_app(self.app.clone())
            .with_settings(self.fetch_settings()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    const YAML: &str = r#"
base_url: https://example.cybozu.com
app: "9999"
auth:
  type: api_token
  tokens: ["token-a", "token-b"]
basic_auth:
  username: proxy
  password: secret
page_size: 200
rate_limit:
  requests_per_second: 5
  burst_size: 5
cursor_idle_seconds: 300
"#;

    #[test]
    fn test_parse_yaml() {
        let config = ClientConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.base_url, "https://example.cybozu.com");
        assert_eq!(config.app.as_deref(), Some("9999"));
        assert_eq!(
            config.auth,
            AuthDefinition::ApiToken {
                tokens: vec!["token-a".to_string(), "token-b".to_string()]
            }
        );
        assert_eq!(
            config.basic_auth,
            Some(BasicCredentials::new("proxy", "secret"))
        );
        assert_eq!(config.page_size, 200);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 5)));
        assert_eq!(config.cursor_idle_seconds, 300);
        assert_eq!(config.max_offset, MAX_OFFSET);
        assert_eq!(config.id_field, "$id");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_json_password_auth() {
        let config = ClientConfig::from_json_str(
            r#"{
                "base_url": "https://example.cybozu.com",
                "auth": {"type": "password", "username": "user", "password": "pass"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.auth_config(), AuthConfig::password("user", "pass"));
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_load_from_files() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(YAML.as_bytes()).unwrap();
        let config = ClientConfig::load(yaml.path()).unwrap();
        assert_eq!(config.page_size, 200);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(br#"{"base_url": "https://a.example.com", "app": "3"}"#)
            .unwrap();
        let config = ClientConfig::load(json.path()).unwrap();
        assert_eq!(config.app.as_deref(), Some("3"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://override.example.com"),
            (ENV_APP, "12"),
            (ENV_API_TOKEN, "t1, t2"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_yaml_str(YAML)
            .unwrap()
            .with_overrides_from(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.base_url, "https://override.example.com");
        assert_eq!(config.app.as_deref(), Some("12"));
        assert_eq!(
            config.auth,
            AuthDefinition::ApiToken {
                tokens: vec!["t1".to_string(), "t2".to_string()]
            }
        );
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = ClientConfig::from_yaml_str(YAML)
            .unwrap()
            .with_overrides_from(|_| Some("  ".to_string()));
        assert_eq!(config.base_url, "https://example.cybozu.com");
    }

    #[test]
    fn test_validate_errors() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "base_url"));

        let err = ClientConfig::with_api_token("not a url", "t")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = ClientConfig::with_api_token("ftp://example.com", "t")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let mut config = ClientConfig::with_api_token("https://example.com", "t");
        config.page_size = 501;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Config { .. }
        ));

        let config = ClientConfig {
            base_url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingConfigField { ref field } if field == "auth"
        ));
    }

    #[test]
    fn test_cursor_idle_seconds_bounds() {
        let mut config = ClientConfig::with_api_token("https://example.com", "t");

        config.cursor_idle_seconds = i64::MAX / 2;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Config { .. }
        ));
        assert!(matches!(
            config.build_fetcher().unwrap_err(),
            Error::Config { .. }
        ));

        config.cursor_idle_seconds = i64::MAX;
        assert!(matches!(
            config.fetch_settings().unwrap_err(),
            Error::Config { .. }
        ));

        config.cursor_idle_seconds = MAX_CURSOR_IDLE_SECONDS;
        config.validate().unwrap();
        assert_eq!(
            config.fetch_settings().unwrap().cursor_idle_lifetime,
            chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_basic_auth_with_bearer_is_rejected() {
        let config = ClientConfig {
            base_url: "https://example.com".to_string(),
            auth: AuthDefinition::Bearer {
                token: "access".to_string(),
            },
            basic_auth: Some(BasicCredentials::new("proxy", "secret")),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("basic_auth"));

        let config = ClientConfig {
            auth: AuthDefinition::ApiToken {
                tokens: vec!["t".to_string()],
            },
            ..config
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_derived_configs() {
        let config = ClientConfig::from_yaml_str(YAML).unwrap();

        let http = config.http_config();
        assert_eq!(http.base_url.as_deref(), Some("https://example.cybozu.com"));
        assert_eq!(http.timeout, Duration::from_secs(30));
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::new(5, 5)));

        let settings = config.fetch_settings().unwrap();
        assert_eq!(settings.page_size, 200);
        assert_eq!(settings.cursor_idle_lifetime, chrono::Duration::seconds(300));

        let fetcher = config.build_fetcher().unwrap();
        assert_eq!(fetcher.settings().page_size, 200);
    }
}
