//! Snapshot Normalizer
//!
//! Turns a raw option-chain snapshot into the per-strike `QuoteRecord`s the
//! scanner consumes: nearest expiry only, strikes within a window around
//! spot snapped to the listing step, and both sides quoted.
//!
//! Output keeps the input order. It is not sorted by strike.

use super::snapshot::RawSnapshot;
use crate::types::{QuoteRecord, ScanConfig};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Inclusive strike bounds around spot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeWindow {
    pub min: i64,
    pub max: i64,
}

impl StrikeWindow {
    /// `floor((spot ± window) / step) * step`
    pub fn around(spot: Decimal, window: i64, step: i64) -> Self {
        let window = Decimal::from(window);
        let step = Decimal::from(step.max(1));
        let snap = |v: Decimal| ((v / step).floor() * step).to_i64().unwrap_or(0);

        Self {
            min: snap(spot - window),
            max: snap(spot + window),
        }
    }

    pub fn contains(&self, strike: i64) -> bool {
        strike >= self.min && strike <= self.max
    }
}

/// Normalize with the default window (±500, 50-point strikes)
pub fn normalize(snapshot: &RawSnapshot, spot: Decimal) -> Vec<QuoteRecord> {
    normalize_with(snapshot, spot, &ScanConfig::default())
}

/// Normalize using the snapshot's own underlying value as spot
pub fn normalize_snapshot(snapshot: &RawSnapshot, config: &ScanConfig) -> Vec<QuoteRecord> {
    normalize_with(snapshot, snapshot.spot(), config)
}

/// Normalize with an explicit strike window configuration
pub fn normalize_with(snapshot: &RawSnapshot, spot: Decimal, config: &ScanConfig) -> Vec<QuoteRecord> {
    let current_expiry = match snapshot.nearest_expiry() {
        Some(expiry) => expiry,
        None => {
            warn!("Snapshot lists no expiry dates - no data this cycle");
            return Vec::new();
        }
    };

    let window = StrikeWindow::around(spot, config.strike_window, config.strike_step);
    debug!(
        "Normalizing {} rows | expiry {} | spot {} | strikes {}..={}",
        snapshot.records.data.len(),
        current_expiry,
        spot,
        window.min,
        window.max
    );

    let mut records = Vec::new();

    for row in &snapshot.records.data {
        if !row.strike_price.is_finite() {
            continue;
        }
        let strike = row.strike_price.round() as i64;
        if !window.contains(strike) {
            continue;
        }

        let (call_side, put_side) = match (&row.call, &row.put) {
            (Some(ce), Some(pe)) => (ce, pe),
            _ => continue,
        };

        if !call_side.is_expiry(current_expiry) || !put_side.is_expiry(current_expiry) {
            continue;
        }

        let call = call_side.quote();
        let put = put_side.quote();
        if call.is_unquoted() || put.is_unquoted() {
            continue;
        }

        records.push(QuoteRecord {
            strike,
            call_bid: call.bid,
            call_ask: call.ask,
            put_bid: put.bid,
            put_ask: put.ask,
            call_oi: call.open_interest,
            put_oi: put.open_interest,
            call_ltp: call.last,
            put_ltp: put.last,
            call_volume: call.volume,
            put_volume: put.volume,
        });
    }

    debug!("Normalized {} eligible strikes", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::snapshot::{RawOptionSide, RawRecords, RawStrikeRow};
    use rust_decimal_macros::dec;

    const NEAR: &str = "26-Dec-2024";
    const FAR: &str = "02-Jan-2025";

    fn side(expiry: &str, bid: Decimal, ask: Decimal) -> RawOptionSide {
        RawOptionSide {
            expiry_date: Some(expiry.to_string()),
            last_price: Some(bid),
            bid_price: Some(bid),
            ask_price: Some(ask),
            open_interest: Some(5000.0),
            total_traded_volume: Some(100.0),
        }
    }

    fn row(strike: f64, call: Option<RawOptionSide>, put: Option<RawOptionSide>) -> RawStrikeRow {
        RawStrikeRow {
            strike_price: strike,
            expiry_date: Some(NEAR.to_string()),
            call,
            put,
        }
    }

    fn quoted(strike: f64) -> RawStrikeRow {
        row(
            strike,
            Some(side(NEAR, dec!(100), dec!(101))),
            Some(side(NEAR, dec!(50), dec!(51))),
        )
    }

    fn snapshot(data: Vec<RawStrikeRow>) -> RawSnapshot {
        RawSnapshot {
            records: RawRecords {
                expiry_dates: vec![NEAR.to_string(), FAR.to_string()],
                data,
                underlying_value: Some(dec!(17020)),
            },
        }
    }

    fn strikes(records: &[QuoteRecord]) -> Vec<i64> {
        records.iter().map(|r| r.strike).collect()
    }

    #[test]
    fn test_strike_window_snaps_to_step() {
        let window = StrikeWindow::around(dec!(17020), 500, 50);
        assert_eq!(window, StrikeWindow { min: 16500, max: 17500 });

        let window = StrikeWindow::around(dec!(23951.7), 500, 50);
        assert_eq!(window, StrikeWindow { min: 23450, max: 24450 });
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let snap = snapshot(vec![quoted(16450.0), quoted(16500.0), quoted(17500.0), quoted(17550.0)]);
        let records = normalize(&snap, dec!(17020));
        assert_eq!(strikes(&records), vec![16500, 17500]);
    }

    #[test]
    fn test_requires_both_sides() {
        let snap = snapshot(vec![
            row(17000.0, Some(side(NEAR, dec!(1), dec!(2))), None),
            row(17050.0, None, Some(side(NEAR, dec!(1), dec!(2)))),
            quoted(17100.0),
        ]);
        assert_eq!(strikes(&normalize(&snap, dec!(17020))), vec![17100]);
    }

    #[test]
    fn test_only_nearest_expiry() {
        let snap = snapshot(vec![
            row(
                17000.0,
                Some(side(FAR, dec!(100), dec!(101))),
                Some(side(FAR, dec!(50), dec!(51))),
            ),
            row(
                17050.0,
                Some(side(NEAR, dec!(100), dec!(101))),
                Some(side(FAR, dec!(50), dec!(51))),
            ),
            quoted(17100.0),
        ]);
        assert_eq!(strikes(&normalize(&snap, dec!(17020))), vec![17100]);
    }

    #[test]
    fn test_drops_unquoted_sides() {
        let snap = snapshot(vec![
            row(
                17000.0,
                Some(side(NEAR, Decimal::ZERO, Decimal::ZERO)),
                Some(side(NEAR, dec!(50), dec!(51))),
            ),
            row(
                17050.0,
                Some(side(NEAR, dec!(100), dec!(101))),
                Some(side(NEAR, Decimal::ZERO, Decimal::ZERO)),
            ),
            // One-sided quotes survive normalization; the scanner filters them
            row(
                17100.0,
                Some(side(NEAR, Decimal::ZERO, dec!(101))),
                Some(side(NEAR, dec!(50), Decimal::ZERO)),
            ),
        ]);
        assert_eq!(strikes(&normalize(&snap, dec!(17020))), vec![17100]);
    }

    #[test]
    fn test_preserves_input_order() {
        let snap = snapshot(vec![quoted(17200.0), quoted(16900.0), quoted(17050.0)]);
        assert_eq!(strikes(&normalize(&snap, dec!(17020))), vec![17200, 16900, 17050]);
    }

    #[test]
    fn test_no_expiries_yields_empty() {
        let mut snap = snapshot(vec![quoted(17000.0)]);
        snap.records.expiry_dates.clear();
        assert!(normalize(&snap, dec!(17020)).is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let sparse = RawOptionSide {
            expiry_date: Some(NEAR.to_string()),
            bid_price: Some(dec!(12.5)),
            ..Default::default()
        };
        let snap = snapshot(vec![row(17000.0, Some(sparse.clone()), Some(sparse))]);
        let records = normalize(&snap, dec!(17020));

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.call_bid, dec!(12.5));
        assert_eq!(rec.call_ask, Decimal::ZERO);
        assert_eq!(rec.call_oi, 0);
        assert_eq!(rec.put_volume, 0);
        assert_eq!(rec.put_ltp, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_snapshot_uses_underlying_value() {
        let snap = snapshot(vec![quoted(16400.0), quoted(17000.0)]);
        let records = normalize_snapshot(&snap, &ScanConfig::default());
        assert_eq!(strikes(&records), vec![17000]);
    }
}
