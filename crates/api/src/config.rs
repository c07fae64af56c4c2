use std::time::Duration;

use vitrine_gateway::ai::{GatewayConfig, DEFAULT_MODEL};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins for `/api/v1`, parsed from comma-separated
    /// `CORS_ORIGINS`. The generator endpoint accepts any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`). Must exceed the
    /// gateway timeout so generation failures are reported as errors.
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Language-model gateway connection.
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                        |
    /// | `PORT`                  | `3000`                           |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `90`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                             |
    /// | `AI_GATEWAY_URL`        | `http://localhost:8080/v1`       |
    /// | `AI_GATEWAY_API_KEY`    | unset                            |
    /// | `AI_MODEL`              | [`DEFAULT_MODEL`]                |
    /// | `GATEWAY_TIMEOUT_SECS`  | `60`                             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let gateway_timeout_secs: u64 = std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GATEWAY_TIMEOUT_SECS must be a valid u64");

        let gateway = GatewayConfig {
            base_url: std::env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1".into()),
            api_key: std::env::var("AI_GATEWAY_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            timeout: Duration::from_secs(gateway_timeout_secs),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            gateway,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
