//! Scan Cycle Service
//!
//! One cycle = market-hours check → fetch → normalize → scan → dispatch.
//! The web handlers and the CLI both drive cycles through `BoxScanService`.
//! `quotes_at` stops after normalize: it never touches the alerted pairs.
//!
//! The `AlertedSet` is the only state shared across cycles. It sits behind
//! a mutex held for the whole scan, so concurrent requests serialize their
//! read-modify-insert and each pair alerts at most once. Fetching and alert
//! delivery run outside the lock.

use crate::alerts::AlertDispatcher;
use crate::arbitrage::{AlertedSet, BoxScanner};
use crate::chain::{normalize_snapshot, SnapshotSource};
use crate::market_hours::MarketHours;
use crate::toml_config::TomlConfig;
use crate::types::{AlertPayload, BoxCandidate, QuoteRecord, ScanConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Scanned,
    OutsideMarketHours,
    NoData,
}

/// Everything one cycle produced
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub timestamp: String,
    pub status: CycleStatus,
    pub records: Vec<QuoteRecord>,
    pub boxes: Vec<BoxCandidate>,
    pub new_alerts: Vec<AlertPayload>,
}

impl CycleReport {
    fn empty(timestamp: String, status: CycleStatus) -> Self {
        Self {
            timestamp,
            status,
            records: Vec::new(),
            boxes: Vec::new(),
            new_alerts: Vec::new(),
        }
    }
}

/// Runtime-adjustable settings (reloaded on SIGHUP)
#[derive(Debug, Clone, Default)]
struct Settings {
    scan: ScanConfig,
    hours: MarketHours,
}

pub struct BoxScanService {
    source: Arc<dyn SnapshotSource>,
    dispatcher: AlertDispatcher,
    alerted: Mutex<AlertedSet>,
    settings: RwLock<Settings>,
}

impl BoxScanService {
    pub fn new(source: Arc<dyn SnapshotSource>, dispatcher: AlertDispatcher, config: TomlConfig) -> Self {
        Self {
            source,
            dispatcher,
            alerted: Mutex::new(AlertedSet::new()),
            settings: RwLock::new(Settings {
                scan: config.scanner,
                hours: config.market_hours,
            }),
        }
    }

    /// Swap in new thresholds and session window; the AlertedSet is kept.
    pub async fn reload(&self, config: TomlConfig) {
        let mut settings = self.settings.write().await;
        settings.scan = config.scanner;
        settings.hours = config.market_hours;
        info!(
            "Configuration reloaded: top_n={} min_oi={} alert>{}",
            settings.scan.top_n, settings.scan.min_open_interest, settings.scan.alert_profit_threshold
        );
    }

    /// Number of strike pairs alerted so far in this process
    pub async fn alerted_count(&self) -> usize {
        self.alerted.lock().await.len()
    }

    pub async fn run_cycle(&self) -> CycleReport {
        self.run_cycle_at(Utc::now()).await
    }

    /// Normalized quotes only: no scan, no alerts
    pub async fn quotes(&self) -> CycleReport {
        self.quotes_at(Utc::now()).await
    }

    pub async fn quotes_at(&self, now: DateTime<Utc>) -> CycleReport {
        let Settings { scan, hours } = self.settings.read().await.clone();
        match self.load_records(now, &scan, &hours).await {
            Ok((timestamp, records)) => CycleReport {
                records,
                ..CycleReport::empty(timestamp, CycleStatus::Scanned)
            },
            Err(report) => report,
        }
    }

    /// Gate, fetch and normalize. `Err` carries the empty report to return.
    async fn load_records(
        &self,
        now: DateTime<Utc>,
        scan: &ScanConfig,
        hours: &MarketHours,
    ) -> Result<(String, Vec<QuoteRecord>), CycleReport> {
        let timestamp = hours.display_timestamp(now);

        if !hours.is_open_at(now) {
            info!("⏰ Outside market hours. Skipping data fetch.");
            return Err(CycleReport::empty(timestamp, CycleStatus::OutsideMarketHours));
        }

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Option chain unavailable from {}: {}", self.source.describe(), e);
                return Err(CycleReport::empty(timestamp, CycleStatus::NoData));
            }
        };

        let records = normalize_snapshot(&snapshot, scan);
        if records.is_empty() {
            info!("No eligible strikes in snapshot");
            return Err(CycleReport::empty(timestamp, CycleStatus::NoData));
        }

        Ok((timestamp, records))
    }

    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> CycleReport {
        let Settings { scan, hours } = self.settings.read().await.clone();
        let (timestamp, records) = match self.load_records(now, &scan, &hours).await {
            Ok(loaded) => loaded,
            Err(report) => return report,
        };

        let scanner = BoxScanner::new(scan);
        let (outcome, alerted_total) = {
            let mut alerted = self.alerted.lock().await;
            let outcome = scanner.scan(&records, &mut alerted);
            (outcome, alerted.len())
        };

        info!(
            "Cycle {} | {} strikes | {} boxes | {} new alerts | {} pairs alerted this session",
            timestamp,
            records.len(),
            outcome.ranked.len(),
            outcome.new_alerts.len(),
            alerted_total
        );

        self.dispatcher.dispatch(&outcome.new_alerts).await;

        CycleReport {
            timestamp,
            status: CycleStatus::Scanned,
            records,
            boxes: outcome.ranked,
            new_alerts: outcome.new_alerts,
        }
    }
}
