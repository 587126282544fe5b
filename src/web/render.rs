//! HTML dashboard rendering
//!
//! Server-side table of the ranked boxes. Every cell is numeric or a fixed
//! label except the timestamp, which is escaped.

use crate::service::{CycleReport, CycleStatus};
use std::fmt::Write;

const COLUMNS: [&str; 9] = [
    "Strike A",
    "Strike B",
    "Call Buy @A (Ask)",
    "Call Sell @B (Bid)",
    "Put Buy @B (Ask)",
    "Put Sell @A (Bid)",
    "Box Value",
    "Box Cost",
    "Profit",
];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn status_line(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::Scanned => "Live option chain",
        CycleStatus::OutsideMarketHours => "Outside market hours (09:15–15:30 IST)",
        CycleStatus::NoData => "Option chain unavailable this cycle",
    }
}

pub fn render_page(report: &CycleReport) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"60\">\n\
         <title>Nifty Box Spread Arbitrage</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }\n\
         th { background: #f0f0f0; }\n\
         td.profit { font-weight: bold; color: #0a7a0a; }\n\
         td.loss { color: #b00; }\n\
         </style>\n</head>\n<body>\n",
    );

    let _ = writeln!(html, "<h1>📦 Nifty Box Spread Arbitrage</h1>");
    let _ = writeln!(
        html,
        "<p>Last updated: {} &middot; {}</p>",
        escape(&report.timestamp),
        status_line(report.status)
    );

    html.push_str("<table>\n<tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr>\n");

    if report.boxes.is_empty() {
        let _ = writeln!(
            html,
            "<tr><td colspan=\"{}\" style=\"text-align:center\">No box spreads found</td></tr>",
            COLUMNS.len()
        );
    }

    for b in &report.boxes {
        let class = if b.profit.is_sign_positive() && !b.profit.is_zero() {
            "profit"
        } else {
            "loss"
        };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>",
            b.strike_a,
            b.strike_b,
            b.call_buy_a,
            b.call_sell_b,
            b.put_buy_b,
            b.put_sell_a,
            b.box_value,
            b.box_cost,
            class,
            b.profit
        );
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
