//! Connector configuration.
//!
//! Layered lowest to highest: built-in defaults, a TOML file, environment
//! variables, then command-line flags (applied by `main`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use autoclaim_protocol::{
    DEFAULT_AWS_REGION, DEFAULT_BIND_ADDR, DEFAULT_NOTARIZE_URL, DEFAULT_SUMMARIZE_URL,
    STEP_DWELL_SECS, SUMMARIZER_FUNCTION_NAME, TICK_INTERVAL_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Upstream relayed by `POST /api/notarize`.
    pub notarize_url: String,
    /// Summarize gateway called directly by the guided report.
    pub summarize_url: String,
    pub function: FunctionConfig,
    pub dispatch: DispatchConfig,
}

/// Serverless summarizer invoked by `POST /api/accident-report`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    pub name: String,
    pub region: String,
    /// Invocation endpoint. Derived from `region` and `name` when unset.
    pub invoke_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub tick_ms: u64,
    pub dwell_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            notarize_url: DEFAULT_NOTARIZE_URL.into(),
            summarize_url: DEFAULT_SUMMARIZE_URL.into(),
            function: FunctionConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: SUMMARIZER_FUNCTION_NAME.into(),
            region: DEFAULT_AWS_REGION.into(),
            invoke_url: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_INTERVAL_MS,
            dwell_secs: STEP_DWELL_SECS,
        }
    }
}

impl std::fmt::Debug for FunctionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionConfig")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("invoke_url", &self.invoke_url)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "<set>"))
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<set>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl FunctionConfig {
    /// Endpoint the summarizer event is POSTed to.
    pub fn endpoint(&self) -> String {
        match &self.invoke_url {
            Some(url) => url.clone(),
            None => format!(
                "https://lambda.{}.amazonaws.com/2015-03-31/functions/{}/invocations",
                self.region, self.name
            ),
        }
    }
}

/// `$XDG_CONFIG_HOME/autoclaim/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("autoclaim").join("config.toml"))
}

impl AppConfig {
    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given (it must exist), otherwise from the
    /// default location if present, then apply the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the dispatch loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "dispatch.tick_ms",
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Override fields from environment-style variables looked up via `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AUTOCLAIM_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = get("AUTOCLAIM_NOTARIZE_URL") {
            self.notarize_url = v;
        }
        if let Some(v) = get("AUTOCLAIM_SUMMARIZE_URL") {
            self.summarize_url = v;
        }
        if let Some(v) = get("AUTOCLAIM_FUNCTION_NAME") {
            self.function.name = v;
        }
        if let Some(v) = get("AUTOCLAIM_FUNCTION_URL") {
            self.function.invoke_url = Some(v);
        }
        if let Some(v) = get("AWS_REGION") {
            self.function.region = v;
        }
        if let Some(v) = get("AWS_ACCESS_KEY_ID") {
            self.function.access_key_id = Some(v);
        }
        if let Some(v) = get("AWS_SECRET_ACCESS_KEY") {
            self.function.secret_access_key = Some(v);
        }
        if let Some(v) = get("AWS_SESSION_TOKEN") {
            self.function.session_token = Some(v);
        }
        if let Some(v) = get("AUTOCLAIM_TICK_MS") {
            self.dispatch.tick_ms = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "AUTOCLAIM_TICK_MS",
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_credentials() {
        let mut config = FunctionConfig::default();
        config.secret_access_key = Some("hunter2".into());
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<set>"));
    }

    #[test]
    fn endpoint_derives_from_region() {
        let mut config = FunctionConfig::default();
        config.region = "ap-southeast-1".into();
        assert_eq!(
            config.endpoint(),
            "https://lambda.ap-southeast-1.amazonaws.com/2015-03-31/functions/accident-report-summarizer/invocations"
        );
        config.invoke_url = Some("http://127.0.0.1:9001/invoke".into());
        assert_eq!(config.endpoint(), "http://127.0.0.1:9001/invoke");
    }
}
