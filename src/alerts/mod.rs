//! Alert Notification Module
//!
//! Delivers newly qualified box spreads to external messaging endpoints.
//! Delivery is best-effort: every sink failure is logged and swallowed, and
//! the pair stays marked as alerted (at-most-once, never retried). Each
//! send is bounded by a timeout so a silent endpoint cannot stall a cycle.
//!
//! Usage:
//!   Set TELEGRAM_TOKEN + CHAT_ID and/or DISCORD_WEBHOOK in the environment.
//!   Sinks without credentials are not registered.

pub mod discord;
pub mod telegram;

pub use discord::DiscordNotifier;
pub use telegram::TelegramNotifier;

use crate::types::{AlertPayload, BotConfig};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;
use tracing::{error, info, warn};

/// Upper bound on a single sink delivery
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client shared by the webhook-style sinks
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build alert HTTP client ({}), using defaults", e);
            reqwest::Client::new()
        })
}

/// An external endpoint that can deliver alert messages
#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, alert: &AlertPayload) -> Result<()>;
}

/// Human-readable alert text shared by the text-based sinks
pub fn format_alert_message(alert: &AlertPayload) -> String {
    format!(
        "📦 Nifty Box Arbitrage Alert!\n\n\
         Strike A: {}\n\
         Strike B: {}\n\
         Box Value: ₹{}\n\
         Box Cost: ₹{}\n\
         📈 Profit: ₹{} per lot\n",
        alert.strike_a, alert.strike_b, alert.box_value, alert.box_cost, alert.profit
    )
}

/// Fans every alert out to every registered sink
pub struct AlertDispatcher {
    sinks: Vec<Box<dyn AlertSink>>,
    send_timeout: Duration,
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self {
            sinks: Vec::new(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl AlertDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sinks whose credentials are present in `config`
    pub fn from_config(config: &BotConfig) -> Self {
        let timeout = Duration::from_secs(config.fetch_timeout_secs.max(1));
        let mut dispatcher = Self::new().with_send_timeout(timeout);

        match (&config.telegram_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                dispatcher.add_sink(Box::new(TelegramNotifier::new(
                    token.clone(),
                    chat_id.clone(),
                    timeout,
                )));
            }
            _ => warn!("TELEGRAM_TOKEN/CHAT_ID not set - Telegram alerts disabled"),
        }

        match &config.discord_webhook {
            Some(url) => dispatcher.add_sink(Box::new(DiscordNotifier::new(url.clone(), timeout))),
            None => info!("DISCORD_WEBHOOK not set - Discord alerts disabled"),
        }

        dispatcher
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        info!("{} alerts enabled", sink.name());
        self.sinks.push(sink);
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver every alert to every sink. Returns the number of successful deliveries.
    pub async fn dispatch(&self, alerts: &[AlertPayload]) -> usize {
        if alerts.is_empty() {
            return 0;
        }
        if self.sinks.is_empty() {
            warn!("{} box alerts not delivered - no alert sinks configured", alerts.len());
            return 0;
        }

        let deliveries = alerts
            .iter()
            .flat_map(|alert| self.sinks.iter().map(move |sink| (sink, alert)))
            .map(|(sink, alert)| async move {
                match tokio::time::timeout(self.send_timeout, sink.send(alert)).await {
                    Ok(Ok(())) => {
                        info!("{} alert sent for {}/{} box", sink.name(), alert.strike_a, alert.strike_b);
                        true
                    }
                    Ok(Err(e)) => {
                        error!("{} error: {:#}", sink.name(), e);
                        false
                    }
                    Err(_) => {
                        error!(
                            "{} timed out after {:?} for {}/{} box",
                            sink.name(),
                            self.send_timeout,
                            alert.strike_a,
                            alert.strike_b
                        );
                        false
                    }
                }
            });

        join_all(deliveries).await.into_iter().filter(|ok| *ok).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        sent: Arc<Mutex<Vec<(i64, i64)>>>,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        fn name(&self) -> &str {
            "Recording"
        }

        async fn send(&self, alert: &AlertPayload) -> Result<()> {
            self.sent.lock().unwrap().push((alert.strike_a, alert.strike_b));
            Ok(())
        }
    }

    struct FailingSink;

    /// Accepts the alert and never answers
    struct SilentSink;

    #[async_trait]
    impl AlertSink for SilentSink {
        fn name(&self) -> &str {
            "Silent"
        }

        async fn send(&self, _alert: &AlertPayload) -> Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[async_trait]
    impl AlertSink for FailingSink {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn send(&self, _alert: &AlertPayload) -> Result<()> {
            anyhow::bail!("endpoint unreachable")
        }
    }

    fn alert(strike_a: i64, strike_b: i64) -> AlertPayload {
        AlertPayload {
            strike_a,
            strike_b,
            box_value: Decimal::from(strike_b - strike_a),
            box_cost: dec!(80.5),
            profit: dec!(19.5),
        }
    }

    #[test]
    fn test_message_format() {
        let msg = format_alert_message(&AlertPayload {
            strike_a: 17000,
            strike_b: 17100,
            box_value: dec!(100),
            box_cost: dec!(80),
            profit: dec!(20),
        });
        assert_eq!(
            msg,
            "📦 Nifty Box Arbitrage Alert!\n\nStrike A: 17000\nStrike B: 17100\nBox Value: ₹100\nBox Cost: ₹80\n📈 Profit: ₹20 per lot\n"
        );
    }

    #[test]
    fn test_failures_are_swallowed() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = AlertDispatcher::new();
        dispatcher.add_sink(Box::new(FailingSink));
        dispatcher.add_sink(Box::new(RecordingSink { sent: Arc::clone(&sent) }));

        let delivered =
            tokio_test::block_on(dispatcher.dispatch(&[alert(17000, 17100), alert(17000, 17200)]));

        assert_eq!(delivered, 2);
        assert_eq!(*sent.lock().unwrap(), vec![(17000, 17100), (17000, 17200)]);
    }

    #[tokio::test]
    async fn test_no_sinks_delivers_nothing() {
        let dispatcher = AlertDispatcher::new();
        assert!(!dispatcher.is_enabled());
        assert_eq!(dispatcher.dispatch(&[alert(17000, 17100)]).await, 0);
    }

    #[tokio::test]
    async fn test_silent_sink_times_out() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = AlertDispatcher::new().with_send_timeout(Duration::from_millis(100));
        dispatcher.add_sink(Box::new(SilentSink));
        dispatcher.add_sink(Box::new(RecordingSink { sent: Arc::clone(&sent) }));

        let delivered = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.dispatch(&[alert(17000, 17100)]),
        )
        .await
        .expect("dispatch must not hang on a silent sink");

        assert_eq!(delivered, 1);
        assert_eq!(*sent.lock().unwrap(), vec![(17000, 17100)]);
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = BotConfig {
            telegram_token: Some("token".to_string()),
            telegram_chat_id: None,
            discord_webhook: Some("https://discord.com/api/webhooks/1/abc".to_string()),
            ..BotConfig::default()
        };
        let dispatcher = AlertDispatcher::from_config(&config);
        assert_eq!(dispatcher.sink_count(), 1);
        assert_eq!(dispatcher.send_timeout(), Duration::from_secs(10));
    }
}
