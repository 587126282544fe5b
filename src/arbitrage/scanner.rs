//! Box-Spread Scanner
//!
//! Exhaustive pairwise scan over one normalized snapshot. For every strike
//! pair A < B it prices the box (long call A, short call B, long put B,
//! short put A), compares the market cost with the riskless payoff
//! B − A, and ranks the results by profit.
//!
//! Pairs are visited once, in input order: (records[i], records[j]) with
//! i < j. A pair whose first record does not have the lower strike is
//! skipped, not mirrored, so callers feeding unsorted records will see
//! fewer candidates.
//!
//! Alerting is one-shot per pair for the lifetime of the injected
//! `AlertedSet`; ranking is stateless.

use super::alerted::AlertedSet;
use crate::types::{AlertPayload, BoxCandidate, QuoteRecord, ScanConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanOutcome {
    /// Top boxes by profit, highest first
    pub ranked: Vec<BoxCandidate>,
    /// Pairs that crossed the alert threshold for the first time
    pub new_alerts: Vec<AlertPayload>,
}

/// Scan with the default thresholds (top 10, OI ≥ 1000, alert above 15)
pub fn scan_for_boxes(records: &[QuoteRecord], alerted: &mut AlertedSet) -> ScanOutcome {
    BoxScanner::default().scan(records, alerted)
}

/// Box spread scanner with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct BoxScanner {
    config: ScanConfig,
}

impl BoxScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan all strike pairs, record new alerts in `alerted`, return the ranked top N.
    pub fn scan(&self, records: &[QuoteRecord], alerted: &mut AlertedSet) -> ScanOutcome {
        if records.len() < 2 {
            return ScanOutcome::default();
        }

        let mut boxes: Vec<BoxCandidate> = Vec::new();
        let mut new_alerts: Vec<AlertPayload> = Vec::new();

        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                let a = &records[i];
                let b = &records[j];

                if a.strike >= b.strike {
                    continue;
                }

                let min_oi = self.config.min_open_interest;
                if !a.is_liquid(min_oi) || !b.is_liquid(min_oi) {
                    continue;
                }

                let candidate = price_box(a, b);

                if candidate.profit > self.config.alert_profit_threshold
                    && alerted.mark(candidate.strike_a, candidate.strike_b)
                {
                    info!("📦 BOX OPPORTUNITY: {}", candidate);
                    new_alerts.push(AlertPayload::from(&candidate));
                }

                boxes.push(candidate);
            }
        }

        // Stable: equal profits keep enumeration order
        boxes.sort_by(|x, y| y.profit.cmp(&x.profit));
        boxes.truncate(self.config.top_n);

        debug!(
            "Scanned {} records | {} ranked | {} new alerts",
            records.len(),
            boxes.len(),
            new_alerts.len()
        );

        ScanOutcome {
            ranked: boxes,
            new_alerts,
        }
    }
}

/// Price the box formed by strikes A < B.
///
/// Cost is reported to 2 decimal places; profit is rounded from the
/// unrounded cost.
fn price_box(a: &QuoteRecord, b: &QuoteRecord) -> BoxCandidate {
    // Buy A call, sell B call
    let call_spread = a.call_ask - b.call_bid;
    // Buy B put, sell A put
    let put_spread = b.put_ask - a.put_bid;

    let box_cost = call_spread + put_spread;
    let box_value = Decimal::from(b.strike - a.strike);
    let profit = (box_value - box_cost).round_dp(2);

    if box_cost.is_sign_negative() && !box_cost.is_zero() {
        warn!(
            "Negative box cost {} for {}/{} - crossed quotes in snapshot?",
            box_cost, a.strike, b.strike
        );
    }

    BoxCandidate {
        strike_a: a.strike,
        strike_b: b.strike,
        call_buy_a: a.call_ask,
        call_sell_b: b.call_bid,
        put_buy_b: b.put_ask,
        put_sell_a: a.put_bid,
        box_value,
        box_cost: box_cost.round_dp(2),
        profit,
    }
}
