//! Arbitrage Module
//!
//! Box spread detection over a normalized option chain, plus the registry
//! that keeps alerts one-shot per strike pair.

pub mod alerted;
pub mod scanner;

pub use alerted::AlertedSet;
pub use scanner::{scan_for_boxes, BoxScanner, ScanOutcome};
