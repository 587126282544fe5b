//! Telegram Bot API notifier
//!
//! Posts the plain-text alert to `sendMessage` for a single chat.

use super::{format_alert_message, AlertSink};
use crate::types::AlertPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
}

pub struct TelegramNotifier {
    api_url: String,
    token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String, timeout: Duration) -> Self {
        Self {
            api_url: TELEGRAM_API_URL.to_string(),
            token,
            chat_id,
            client: super::http_client(timeout),
        }
    }

    /// Point at a Bot API mirror or local server
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    fn name(&self) -> &str {
        "Telegram"
    }

    async fn send(&self, alert: &AlertPayload) -> Result<()> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: format_alert_message(alert),
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .context("Telegram request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Telegram API returned status: {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertDispatcher;
    use rust_decimal_macros::dec;

    fn notifier(timeout: Duration) -> TelegramNotifier {
        TelegramNotifier::new("123:ABC".to_string(), "-100".to_string(), timeout)
    }

    #[test]
    fn test_send_message_url() {
        let notifier = notifier(Duration::from_secs(10));
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
    }

    #[tokio::test]
    async fn test_unresponsive_endpoint_does_not_hang_dispatch() {
        // Accepts connections, never writes a response
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut dispatcher = AlertDispatcher::new();
        dispatcher.add_sink(Box::new(
            notifier(Duration::from_millis(200)).with_api_url(format!("http://{}", addr)),
        ));

        let alert = AlertPayload {
            strike_a: 17000,
            strike_b: 17100,
            box_value: dec!(100),
            box_cost: dec!(80),
            profit: dec!(20),
        };
        let delivered = tokio::time::timeout(Duration::from_secs(5), dispatcher.dispatch(&[alert]))
            .await
            .expect("dispatch must finish when the endpoint stays silent");

        assert_eq!(delivered, 0);
        drop(listener);
    }
}
