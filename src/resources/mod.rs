//! Per-session resource economy.

pub mod ledger;

pub use ledger::{MentalOutcome, ResourceLedger, ResourceState};
