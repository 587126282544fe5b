//! Option Chain Module
//!
//! Raw NSE snapshot types, the sources that fetch them, and the normalizer
//! that reduces a snapshot to scanner-ready quote records.

pub mod client;
pub mod normalizer;
pub mod snapshot;

pub use client::{FeedError, FileSnapshotSource, NseClient, SnapshotSource};
pub use normalizer::{normalize, normalize_snapshot, normalize_with, StrikeWindow};
pub use snapshot::{LegQuote, RawOptionSide, RawRecords, RawSnapshot, RawStrikeRow};
