use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{WrapErr, eyre};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Which model backend serves completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Ollama { host: String },
    Bedrock { region: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backend: Backend,
    pub model: String,
    /// `None` uses the built-in catalog.
    pub cases_path: Option<PathBuf>,
    pub request_timeout: Duration,
    /// Sessions untouched for this long are dropped by the idle sweep.
    pub session_idle_ttl: Duration,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys fall back to
    /// defaults; present but invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = get("PATSIM_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .wrap_err("PATSIM_BIND must be a socket address such as 127.0.0.1:3000")?;

        let backend = match get("PATSIM_BACKEND").as_deref().unwrap_or("ollama") {
            "ollama" => Backend::Ollama {
                host: get("OLLAMA_HOST")
                    .unwrap_or_else(|| patsim_llm::ollama::DEFAULT_HOST.to_string()),
            },
            "bedrock" => Backend::Bedrock {
                region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            },
            other => {
                return Err(eyre!(
                    "PATSIM_BACKEND must be \"ollama\" or \"bedrock\", got {other:?}"
                ));
            }
        };

        let positive_secs = |key: &str, default: u64| -> eyre::Result<u64> {
            match get(key) {
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| eyre!("{key} must be a positive integer, got {raw:?}")),
                None => Ok(default),
            }
        };
        let timeout_secs = positive_secs("PATSIM_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let idle_secs = positive_secs("PATSIM_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?;

        let log_format = match get("PATSIM_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(eyre!(
                    "PATSIM_LOG_FORMAT must be \"text\" or \"json\", got {other:?}"
                ));
            }
        };

        Ok(Self {
            bind,
            backend,
            model: get("PATSIM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            cases_path: get("PATSIM_CASES").map(PathBuf::from),
            request_timeout: Duration::from_secs(timeout_secs),
            session_idle_ttl: Duration::from_secs(idle_secs),
            log_format,
        })
    }
}
