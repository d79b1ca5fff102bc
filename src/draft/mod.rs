//! Card drafts.
//!
//! A draft offers a few templates from a stage pool. Regular drafts roll a
//! tier per slot from a score-banded `DraftProbabilityTable`; monster drafts
//! offer the whole monster pool.

pub mod selector;
pub mod table;

pub use selector::{fallback_order, DraftKind, DraftOptions, DraftSelector};
pub use table::{DraftProbabilityTable, ProbabilityRow, COMMON_ONLY};
