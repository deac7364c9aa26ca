use std::env;
use std::net::SocketAddr;

use crate::error::RelayError;

pub const DEFAULT_APP_ID: &str = "1052939";
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./private-key.pem";
pub const DEFAULT_INSTALLATION_ID: u64 = 99085453;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:latest";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// What the webhook caller sees when the reply comment could not be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishFailurePolicy {
    /// Answer `processed` anyway and only log the failure.
    #[default]
    Silent,
    /// Answer `502 Bad Gateway` with `{"status": "publish_failed"}`.
    Surface,
}

impl std::str::FromStr for PublishFailurePolicy {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "surface" => Ok(Self::Surface),
            other => Err(RelayError::Config(format!(
                "PUBLISH_FAILURE_POLICY must be 'silent' or 'surface', got '{}'",
                other
            ))),
        }
    }
}

/// Relay configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub app_id: String,
    pub private_key_path: String,
    pub installation_id: u64,
    pub ollama_url: String,
    pub ollama_model: String,
    pub github_api_url: String,
    pub bind_addr: SocketAddr,
    pub webhook_secret: Option<String>,
    pub publish_failure_policy: PublishFailurePolicy,
}

impl RelayConfig {
    /// Reads the process environment. Binaries load `.env` before calling this.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = get("GITHUB_APP_ID")
            .or_else(|| get("APP_ID"))
            .unwrap_or_else(|| DEFAULT_APP_ID.to_string());

        let private_key_path =
            get("PRIVATE_KEY_PATH").unwrap_or_else(|| DEFAULT_PRIVATE_KEY_PATH.to_string());

        let installation_id = match get("INSTALLATION_ID") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                RelayError::Config(format!("INSTALLATION_ID must be numeric, got '{}'", raw))
            })?,
            None => DEFAULT_INSTALLATION_ID,
        };

        let ollama_url = get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let ollama_model = get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        let github_api_url =
            get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|_| {
            RelayError::Config(format!("BIND_ADDR is not a socket address: '{}'", bind_raw))
        })?;

        let publish_failure_policy = match get("PUBLISH_FAILURE_POLICY") {
            Some(raw) => raw.parse()?,
            None => PublishFailurePolicy::default(),
        };

        Ok(RelayConfig {
            app_id,
            private_key_path,
            installation_id,
            ollama_url: trim_base_url(ollama_url),
            ollama_model,
            github_api_url: trim_base_url(github_api_url),
            bind_addr,
            webhook_secret: get("WEBHOOK_SECRET"),
            publish_failure_policy,
        })
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
