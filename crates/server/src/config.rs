use axum_extra::extract::cookie::Key;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Minimum length of the session secret, in bytes. Cookie signing keys need 512 bits.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Identity provider endpoints and client credentials.
///
/// Endpoints default to Google's.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Timeout for each request to the token and userinfo endpoints.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Externally visible base URL; the provider redirects back to `{public_url}/auth/callback`.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    pub session_secret: String,
    #[serde(default)]
    pub secure_cookies: bool,
    pub provider: ProviderConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_public_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_authorization_url() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_url() -> String {
    "https://accounts.google.com/o/oauth2/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_scopes() -> Vec<String> {
    ["openid", "email", "profile"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// The redirect URI registered with the provider.
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.public_url.trim_end_matches('/'))
    }

    /// Signing key for session cookies, derived from `session_secret`.
    pub fn cookie_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.session_secret.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!(
                "session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
            ))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
            )));
        }
        if self.provider.client_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.client_id must not be empty".into(),
            ));
        }
        if self.provider.client_secret.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.client_secret must not be empty".into(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "provider.timeout_secs must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("public_url", &self.public_url),
            ("provider.authorization_url", &self.provider.authorization_url),
            ("provider.token_url", &self.provider.token_url),
            ("provider.userinfo_url", &self.provider.userinfo_url),
        ] {
            Url::parse(value)
                .map_err(|e| ConfigError::Validation(format!("{name} is not a valid URL: {e}")))?;
        }
        Ok(())
    }
}

/// Environment override source.
///
/// Any environment variable matching the key path separated by double underscores
/// (e.g. `PROVIDER__CLIENT_SECRET`) overrides the file value. `PROVIDER__SCOPES` is a
/// space-separated list.
pub fn environment() -> config::Environment {
    config::Environment::default()
        .separator("__")
        .try_parsing(true)
        .list_separator(" ")
        .with_list_parse_key("provider.scopes")
}

/// Load application configuration from an optional `config.yaml` + environment overrides.
///
/// Secrets are expected to come from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(environment())
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;

    Ok(app)
}
