//! Read-side services over the audit store.
//!
//! [`AuditTrail`] is the application's audit surface: filtered listing with
//! local free-text refinement, derived statistics over a bounded working
//! set, denial recording for the access gate, and the flat export rows
//! consumed by offline tooling.

pub mod audit_trail;
pub mod export;


pub use audit_trail::{AuditStats, AuditTrail, StatsView, DEFAULT_STATS_SCAN_LIMIT};
pub use export::{export_rows, ExportRow};
