//! Configuration management
//! Load settings from .env file and environment variables

use anyhow::{Context, Result};
use std::str::FromStr;

// Re-export BotConfig for external access
pub use crate::types::BotConfig;

pub fn load_config() -> Result<BotConfig> {
    dotenv::dotenv().ok();
    build_config(|key| std::env::var(key).ok())
}

/// Load from a specific .env file (e.g. `.env.banknifty`)
pub fn load_config_from_file(path: &str) -> Result<BotConfig> {
    dotenv::from_filename(path).with_context(|| format!("Failed to load {}", path))?;
    build_config(|key| std::env::var(key).ok())
}

fn build_config<F>(lookup: F) -> Result<BotConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = BotConfig::default();
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    Ok(BotConfig {
        symbol: non_empty("NSE_SYMBOL")
            .map(|s| s.trim().to_uppercase())
            .unwrap_or(defaults.symbol),

        fetch_attempts: parse_or(&lookup, "FETCH_ATTEMPTS", defaults.fetch_attempts)?,
        fetch_retry_delay_ms: parse_or(&lookup, "FETCH_RETRY_DELAY_MS", defaults.fetch_retry_delay_ms)?,
        fetch_timeout_secs: parse_or(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,

        telegram_token: non_empty("TELEGRAM_TOKEN"),
        telegram_chat_id: non_empty("CHAT_ID"),
        discord_webhook: non_empty("DISCORD_WEBHOOK"),
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = build_config(lookup(&[])).unwrap();
        assert_eq!(config.symbol, "NIFTY");
        assert_eq!(config.fetch_attempts, 3);
        assert_eq!(config.fetch_retry_delay_ms, 2000);
        assert!(config.telegram_token.is_none());
        assert!(config.discord_webhook.is_none());
    }

    #[test]
    fn test_reads_values() {
        let config = build_config(lookup(&[
            ("NSE_SYMBOL", "banknifty"),
            ("FETCH_ATTEMPTS", "5"),
            ("TELEGRAM_TOKEN", "123:ABC"),
            ("CHAT_ID", "-1001"),
            ("DISCORD_WEBHOOK", ""),
        ]))
        .unwrap();

        assert_eq!(config.symbol, "BANKNIFTY");
        assert_eq!(config.fetch_attempts, 5);
        assert_eq!(config.telegram_token.as_deref(), Some("123:ABC"));
        assert_eq!(config.telegram_chat_id.as_deref(), Some("-1001"));
        // Empty values count as unset
        assert!(config.discord_webhook.is_none());
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = build_config(lookup(&[("FETCH_RETRY_DELAY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("FETCH_RETRY_DELAY_MS"));
    }
}
