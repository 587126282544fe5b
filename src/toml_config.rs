//! TOML Configuration Reader for the scanner
//!
//! Reads scanner thresholds and the market-hours window from a TOML file.
//! Every field is optional and falls back to the built-in defaults.
//! Supports hot-reloading via SIGHUP signal.
//!
//! Example:
//! ```toml
//! [scanner]
//! top_n = 10
//! min_open_interest = 1000
//! alert_profit_threshold = 15.0
//!
//! [market_hours]
//! open = "09:15:00"
//! close = "15:30:00"
//! enforce = true
//! ```

use crate::market_hours::MarketHours;
use crate::types::ScanConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level TOML configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub scanner: ScanConfig,
    pub market_hours: MarketHours,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;

        if config.scanner.top_n == 0 {
            anyhow::bail!("scanner.top_n must be at least 1");
        }
        if config.scanner.strike_step <= 0 {
            anyhow::bail!("scanner.strike_step must be positive");
        }

        Ok(config)
    }
}
