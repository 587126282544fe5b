// Core data structures shared by the normalizer, scanner and collaborators

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strike pair key: (lower strike, higher strike)
pub type StrikePair = (i64, i64);

/// Top-level bot configuration loaded from the environment (.env)
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Index symbol queried on the NSE option-chain endpoint
    pub symbol: String,

    // Feed
    pub fetch_attempts: u32,
    pub fetch_retry_delay_ms: u64,
    pub fetch_timeout_secs: u64,

    // Notifications (each sink is disabled when its credentials are absent)
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub discord_webhook: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            symbol: "NIFTY".to_string(),
            fetch_attempts: 3,
            fetch_retry_delay_ms: 2000,
            fetch_timeout_secs: 10,
            telegram_token: None,
            telegram_chat_id: None,
            discord_webhook: None,
        }
    }
}

/// Scanner and normalizer tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of ranked boxes returned per scan
    pub top_n: usize,
    /// Minimum open interest required on every leg
    pub min_open_interest: u64,
    /// Profit (per unit) that must be strictly exceeded to raise an alert
    pub alert_profit_threshold: Decimal,
    /// Half-width of the strike window around spot
    pub strike_window: i64,
    /// Strike listing granularity used to snap the window
    pub strike_step: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_open_interest: 1000,
            alert_profit_threshold: Decimal::from(15),
            strike_window: 500,
            strike_step: 50,
        }
    }
}

/// One eligible strike of the nearest expiry, with both sides quoted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    pub strike: i64,
    pub call_bid: Decimal,
    pub call_ask: Decimal,
    pub put_bid: Decimal,
    pub put_ask: Decimal,
    pub call_oi: u64,
    pub put_oi: u64,
    /// Last traded prices and volumes (informational only)
    pub call_ltp: Decimal,
    pub put_ltp: Decimal,
    pub call_volume: u64,
    pub put_volume: u64,
}

impl QuoteRecord {
    /// True when every quote is two-sided and both open interests reach `min_oi`
    pub fn is_liquid(&self, min_oi: u64) -> bool {
        self.call_bid > Decimal::ZERO
            && self.call_ask > Decimal::ZERO
            && self.put_bid > Decimal::ZERO
            && self.put_ask > Decimal::ZERO
            && self.call_oi >= min_oi
            && self.put_oi >= min_oi
    }
}

/// A priced box spread: long call A / short call B / long put B / short put A
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCandidate {
    pub strike_a: i64,
    pub strike_b: i64,
    /// Call bought at the lower strike (A ask)
    pub call_buy_a: Decimal,
    /// Call sold at the higher strike (B bid)
    pub call_sell_b: Decimal,
    /// Put bought at the higher strike (B ask)
    pub put_buy_b: Decimal,
    /// Put sold at the lower strike (A bid)
    pub put_sell_a: Decimal,
    pub box_value: Decimal,
    pub box_cost: Decimal,
    pub profit: Decimal,
}

impl BoxCandidate {
    pub fn key(&self) -> StrikePair {
        (self.strike_a, self.strike_b)
    }
}

impl fmt::Display for BoxCandidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} box | value {} | cost {} | profit {}",
            self.strike_a, self.strike_b, self.box_value, self.box_cost, self.profit
        )
    }
}

/// Newly qualified opportunity to be dispatched by the notifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload {
    pub strike_a: i64,
    pub strike_b: i64,
    pub box_value: Decimal,
    pub box_cost: Decimal,
    pub profit: Decimal,
}

impl From<&BoxCandidate> for AlertPayload {
    fn from(candidate: &BoxCandidate) -> Self {
        Self {
            strike_a: candidate.strike_a,
            strike_b: candidate.strike_b,
            box_value: candidate.box_value,
            box_cost: candidate.box_cost,
            profit: candidate.profit,
        }
    }
}
