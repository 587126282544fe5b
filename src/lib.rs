//! NIFTY Box Spread Arbitrage Scanner Library
//!
//! Fetches the NSE option chain, normalizes it to per-strike quotes for the
//! nearest expiry, scans every strike pair for mispriced box spreads, and
//! surfaces the ranked results on a web dashboard and via push alerts.

pub mod alerts;
pub mod arbitrage;
pub mod chain;
pub mod config;
pub mod market_hours;
pub mod service;
pub mod toml_config;
pub mod types;
pub mod web;

// Re-export commonly used types
pub use arbitrage::{scan_for_boxes, AlertedSet, BoxScanner, ScanOutcome};
pub use chain::{normalize, RawSnapshot};
pub use config::load_config;
pub use service::{BoxScanService, CycleReport, CycleStatus};
pub use types::{AlertPayload, BotConfig, BoxCandidate, QuoteRecord, ScanConfig};
