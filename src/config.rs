//! Runtime configuration from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::assets::LogoSource;

pub const ENV_ADDR: &str = "SWEEP_REPORT_ADDR";
pub const ENV_BRAND: &str = "SWEEP_REPORT_BRAND";
pub const ENV_LOGO: &str = "SWEEP_REPORT_LOGO";
pub const ENV_LOGO_TIMEOUT_MS: &str = "SWEEP_REPORT_LOGO_TIMEOUT_MS";

const DEFAULT_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_BRAND: &str = "Sweep";
const DEFAULT_LOGO_TIMEOUT_MS: u64 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Settings that shape a generated document.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub brand_name: String,
    pub logo: Option<LogoSource>,
    pub logo_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            brand_name: DEFAULT_BRAND.to_string(),
            logo: None,
            logo_timeout: Duration::from_millis(DEFAULT_LOGO_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub engine: EngineOptions,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr = get(ENV_ADDR)
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: ENV_ADDR,
                reason: e.to_string(),
            })?;

        let logo_timeout = match get(ENV_LOGO_TIMEOUT_MS) {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: ENV_LOGO_TIMEOUT_MS,
                    reason: e.to_string(),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        var: ENV_LOGO_TIMEOUT_MS,
                        reason: "must be greater than zero".into(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_LOGO_TIMEOUT_MS),
        };

        let engine = EngineOptions {
            brand_name: get(ENV_BRAND)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            logo: get(ENV_LOGO).map(|v| LogoSource::parse(&v)),
            logo_timeout,
        };

        Ok(ServerConfig { addr, engine })
    }
}
