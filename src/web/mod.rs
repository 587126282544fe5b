//! Web Dashboard
//!
//! Each page load runs one scan cycle and renders the ranked boxes.
//!
//! Routes:
//! - `GET /`           HTML table of the top boxes
//! - `GET /api/boxes`  the same cycle report as JSON
//! - `GET /api/chain`  the normalized quote records only (no scan, no alerts)
//! - `GET /health`     liveness probe

pub mod render;

use crate::service::BoxScanService;
use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub use render::render_page;

pub type AppState = Arc<BoxScanService>;

pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/boxes", get(api_boxes))
        .route("/api/chain", get(api_chain))
        .route("/health", get(|| async { "OK" }))
        .with_state(service)
}

async fn home(State(service): State<AppState>) -> Html<String> {
    let report = service.run_cycle().await;
    Html(render_page(&report))
}

async fn api_boxes(State(service): State<AppState>) -> Json<crate::service::CycleReport> {
    Json(service.run_cycle().await)
}

async fn api_chain(State(service): State<AppState>) -> Json<Vec<crate::types::QuoteRecord>> {
    Json(service.quotes().await.records)
}
