use std::{env, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway_url: String,
    pub host: String,
    pub port: u16,
    pub session_store_path: String,
    pub gateway_timeout: Duration,
    pub order_refresh: Duration,
    pub history_idle: Duration,
    pub workspace_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let gateway_url =
            env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_store_path =
            env::var("SESSION_STORE_PATH").unwrap_or_else(|_| "sessions.json".to_string());
        let gateway_timeout = seconds_var("GATEWAY_TIMEOUT_SECS", 10)?;
        let order_refresh = seconds_var("ORDER_REFRESH_SECS", 5)?;
        let history_idle = seconds_var("ORDER_IDLE_SECS", 60)?;
        let workspace_idle = seconds_var("WORKSPACE_IDLE_SECS", 30 * 60)?;

        Ok(Self {
            gateway_url,
            host,
            port,
            session_store_path,
            gateway_timeout,
            order_refresh,
            history_idle,
            workspace_idle,
        })
    }
}

fn seconds_var(name: &str, default: u64) -> anyhow::Result<Duration> {
    let secs = match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{name} must be a whole number of seconds"))?,
        Err(_) => default,
    };
    anyhow::ensure!(secs > 0, "{name} must be greater than 0");
    Ok(Duration::from_secs(secs))
}
