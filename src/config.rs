use crate::error::ConfigError;
use serde_derive::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    envy::from_env::<AppConfig>().map_err(ConfigError::env_parse)
}

fn default_session_timeout_sec() -> u64 {
    300
}

fn default_auto_renew_session() -> bool {
    true
}

// the measure endpoint alone can take close to a minute
fn default_request_timeout_sec() -> u64 {
    120
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Overrides the provider's production URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_session_timeout_sec")]
    pub session_timeout_sec: u64,
    /// Log in again before an authenticated call when the session expired
    #[serde(default = "default_auto_renew_session")]
    pub auto_renew_session: bool,
    /// Contract selected right after every login
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
}

impl ClientConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_sec)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(default)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            session_timeout_sec: default_session_timeout_sec(),
            auto_renew_session: default_auto_renew_session(),
            contract: None,
            request_timeout_sec: default_request_timeout_sec(),
        }
    }
}

/// Loads `<PREFIX>_BASE_URL`, `<PREFIX>_SESSION_TIMEOUT_SEC`, ... from the environment.
pub fn load_client_config(prefix: &str) -> Result<ClientConfig, ConfigError> {
    envy::prefixed(env_prefix(prefix))
        .from_env::<ClientConfig>()
        .map_err(|err| from_envy(prefix, err))
}

#[derive(Deserialize, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reads a `{"username": ..., "password": ...}` JSON file.
///
/// Blank values are rejected with [`ConfigError::Invalid`].
pub fn load_credentials_file(path: &Path) -> Result<Credentials, ConfigError> {
    let display = path.display().to_string();
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::credentials_file(&display, e))?;
    let credentials: Credentials =
        serde_json::from_str(&content).map_err(|e| ConfigError::credentials_file(&display, e))?;

    if credentials.username.trim().is_empty() {
        return Err(ConfigError::invalid("username", format!("empty in {}", display)));
    }
    if credentials.password.is_empty() {
        return Err(ConfigError::invalid("password", format!("empty in {}", display)));
    }
    Ok(credentials)
}

/// Reads `<PREFIX>_USERNAME` and `<PREFIX>_PASSWORD`.
pub fn load_credentials_from_env(prefix: &str) -> Result<Credentials, ConfigError> {
    envy::prefixed(env_prefix(prefix))
        .from_env::<Credentials>()
        .map_err(|err| from_envy(prefix, err))
}

/// Picks credentials from, in order: explicit values, a credentials file, the environment.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
    credentials_file: Option<&Path>,
    prefix: &str,
) -> Result<Credentials, ConfigError> {
    if let Some(username) = username {
        let password = password.ok_or_else(|| ConfigError::missing("password"))?;
        return Ok(Credentials { username, password });
    }

    if let Some(path) = credentials_file {
        return load_credentials_file(path);
    }

    load_credentials_from_env(prefix)
}

fn env_prefix(prefix: &str) -> String {
    format!("{}_", prefix.to_uppercase())
}

fn from_envy(prefix: &str, err: envy::Error) -> ConfigError {
    match err {
        envy::Error::MissingValue(field) => {
            ConfigError::missing(format!("{}{}", env_prefix(prefix), field.to_uppercase()))
        }
        other => ConfigError::env_parse(other),
    }
}
