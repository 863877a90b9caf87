//! Configuration loading from environment.

use std::{env, time::Duration};

use anyhow::Context;
use relay_adapters::{GoogleConfig, PaystackConfig};

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub app_env: String,
    pub google: GoogleConfig,
    pub paystack: PaystackConfig,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(var("PORT"), "PORT", 3000u16)?;
        let app_env = var("APP_ENV").unwrap_or_else(|| "development".to_string());
        let timeout = Duration::from_secs(parse_or(
            var("UPSTREAM_TIMEOUT_SECS"),
            "UPSTREAM_TIMEOUT_SECS",
            15u64,
        )?);

        let client_id = var("GOOGLE_CLIENT_ID")
            .ok_or_else(|| anyhow::anyhow!("GOOGLE_CLIENT_ID environment variable is required"))?;
        let mut google = GoogleConfig::new(client_id);
        if let Some(url) = var("GOOGLE_CERTS_URL") {
            google.certs_url = url;
        }
        google.timeout = timeout;

        let secret_key = var("PAYSTACK_SECRET_KEY").ok_or_else(|| {
            anyhow::anyhow!("PAYSTACK_SECRET_KEY environment variable is required")
        })?;
        let mut paystack = PaystackConfig::new(secret_key);
        if let Some(url) = var("PAYSTACK_BASE_URL") {
            paystack.base_url = url;
        }
        paystack.timeout = timeout;

        let rate_limit_max_requests =
            parse_or(var("RATE_LIMIT_MAX_REQUESTS"), "RATE_LIMIT_MAX_REQUESTS", 100u32)?;
        let rate_limit_window = Duration::from_secs(parse_or(
            var("RATE_LIMIT_WINDOW_SECS"),
            "RATE_LIMIT_WINDOW_SECS",
            900u64,
        )?);

        Ok(Self {
            port,
            app_env,
            google,
            paystack,
            rate_limit_max_requests,
            rate_limit_window,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
