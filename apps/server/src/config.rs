use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::auth::{decode_secret_key, AuthConfig};

const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// `None` when QUILL_JWT_SECRET is unset; protected routes then reject everything.
    pub auth: Option<AuthConfig>,
    pub ai_provider: Option<String>,
    pub ai_model: Option<String>,
    pub ai_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("QUILL_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid QUILL_LISTEN_ADDR")?;
        let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("QUILL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = env_millis("QUILL_REQUEST_TIMEOUT_MS", 60_000);
        let ai_timeout_ms = env_millis("QUILL_AI_TIMEOUT_MS", 30_000);
        let request_timeout = Duration::from_millis(timeout_ms);
        let ai_timeout = Duration::from_millis(ai_timeout_ms);
        check_timeouts(request_timeout, ai_timeout)?;

        let auth = match non_empty_var("QUILL_JWT_SECRET") {
            Some(raw) => Some(AuthConfig {
                jwt_secret: decode_secret_key(&raw)?,
                access_token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            }),
            None => None,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout,
            auth,
            ai_provider: non_empty_var("QUILL_AI_PROVIDER"),
            ai_model: non_empty_var("QUILL_AI_MODEL"),
            ai_timeout,
        })
    }
}

/// The provider bound must fire before the HTTP request timeout.
pub fn check_timeouts(request_timeout: Duration, ai_timeout: Duration) -> anyhow::Result<()> {
    if request_timeout <= ai_timeout {
        anyhow::bail!(
            "QUILL_REQUEST_TIMEOUT_MS ({}ms) must be greater than QUILL_AI_TIMEOUT_MS ({}ms)",
            request_timeout.as_millis(),
            ai_timeout.as_millis()
        );
    }
    Ok(())
}

fn env_millis(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout_must_exceed_ai_timeout() {
        assert!(check_timeouts(Duration::from_secs(60), Duration::from_secs(30)).is_ok());
        assert!(check_timeouts(Duration::from_secs(30), Duration::from_secs(30)).is_err());
        assert!(check_timeouts(Duration::from_secs(10), Duration::from_secs(30)).is_err());
    }
}
