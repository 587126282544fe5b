//! Discord webhook notifier
//!
//! Sends each box alert as a rich embed. Embed colour tracks how far the
//! profit clears the alert threshold.

use super::AlertSink;
use crate::types::AlertPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

/// Discord webhook message structure
#[derive(Serialize)]
struct DiscordMessage {
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

/// Discord embed structure for rich formatting
#[derive(Serialize)]
struct DiscordEmbed {
    title: String,
    description: String,
    color: u32,
    fields: Vec<DiscordField>,
    footer: Option<DiscordFooter>,
    timestamp: Option<String>,
}

#[derive(Serialize)]
struct DiscordField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Serialize)]
struct DiscordFooter {
    text: String,
}

pub struct DiscordNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(webhook_url: String, timeout: Duration) -> Self {
        Self {
            webhook_url,
            client: super::http_client(timeout),
        }
    }
}

fn embed_color(profit: Decimal) -> u32 {
    if profit > Decimal::from(50) {
        0x00FF00 // Green - wide mispricing
    } else if profit > Decimal::from(25) {
        0xFFFF00 // Yellow
    } else {
        0xFFA500 // Orange - just over threshold
    }
}

fn build_message(alert: &AlertPayload) -> DiscordMessage {
    let embed = DiscordEmbed {
        title: format!("📦 NIFTY {}/{} Box Spread", alert.strike_a, alert.strike_b),
        description: format!(
            "**Buy** {} CE + {} PE | **Sell** {} CE + {} PE",
            alert.strike_a, alert.strike_b, alert.strike_b, alert.strike_a
        ),
        color: embed_color(alert.profit),
        fields: vec![
            DiscordField {
                name: "Box Value".to_string(),
                value: format!("₹{}", alert.box_value),
                inline: true,
            },
            DiscordField {
                name: "Box Cost".to_string(),
                value: format!("₹{}", alert.box_cost),
                inline: true,
            },
            DiscordField {
                name: "📈 Profit".to_string(),
                value: format!("₹{} per lot", alert.profit),
                inline: true,
            },
        ],
        footer: Some(DiscordFooter {
            text: "Box Arbitrage Scanner | NSE".to_string(),
        }),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    };

    DiscordMessage {
        content: None,
        embeds: vec![embed],
    }
}

#[async_trait]
impl AlertSink for DiscordNotifier {
    fn name(&self) -> &str {
        "Discord"
    }

    async fn send(&self, alert: &AlertPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&build_message(alert))
            .send()
            .await
            .context("Discord webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Discord webhook returned status: {}", status);
        }
        Ok(())
    }
}
