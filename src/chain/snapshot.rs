//! Raw NSE option-chain snapshot
//!
//! Mirrors the JSON returned by `/api/option-chain-indices`. Every quote
//! field is optional: the exchange omits fields for illiquid strikes and the
//! normalizer coerces whatever is missing to zero in one place
//! (`RawOptionSide::quote`).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level response body
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    pub records: RawRecords,
}

/// The unfiltered `records` section (all expiries)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecords {
    /// Expiry dates ordered nearest first, e.g. "26-Dec-2024"
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    #[serde(default)]
    pub data: Vec<RawStrikeRow>,
    pub underlying_value: Option<Decimal>,
}

/// One (strike, expiry) row with optional call (CE) and put (PE) sides
#[derive(Debug, Clone, Deserialize)]
pub struct RawStrikeRow {
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(rename = "CE")]
    pub call: Option<RawOptionSide>,
    #[serde(rename = "PE")]
    pub put: Option<RawOptionSide>,
}

/// One side of a strike as reported by the exchange
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptionSide {
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(rename = "lastPrice")]
    pub last_price: Option<Decimal>,
    #[serde(rename = "bidprice")]
    pub bid_price: Option<Decimal>,
    #[serde(rename = "askPrice")]
    pub ask_price: Option<Decimal>,
    #[serde(rename = "openInterest")]
    pub open_interest: Option<f64>,
    #[serde(rename = "totalTradedVolume")]
    pub total_traded_volume: Option<f64>,
}

/// A side with every missing field coerced to zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegQuote {
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub open_interest: u64,
    pub volume: u64,
}

impl LegQuote {
    /// Neither a bid nor an ask is posted
    pub fn is_unquoted(&self) -> bool {
        self.bid.is_zero() && self.ask.is_zero()
    }
}

impl RawOptionSide {
    /// Optional-to-zero coercion for every numeric field
    pub fn quote(&self) -> LegQuote {
        LegQuote {
            last: self.last_price.unwrap_or(Decimal::ZERO),
            bid: self.bid_price.unwrap_or(Decimal::ZERO),
            ask: self.ask_price.unwrap_or(Decimal::ZERO),
            open_interest: count(self.open_interest),
            volume: count(self.total_traded_volume),
        }
    }

    pub fn is_expiry(&self, expiry: &str) -> bool {
        self.expiry_date.as_deref() == Some(expiry)
    }
}

/// Contract counts arrive as JSON numbers (sometimes with a fractional part)
fn count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

impl RawSnapshot {
    /// Nearest listed expiry, if any
    pub fn nearest_expiry(&self) -> Option<&str> {
        self.records.expiry_dates.first().map(String::as_str)
    }

    /// Spot price of the underlying (zero when absent)
    pub fn spot(&self) -> Decimal {
        self.records.underlying_value.unwrap_or(Decimal::ZERO)
    }
}
