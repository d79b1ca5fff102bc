//! Core engine types: RNG, configuration, errors, persistence.
//!
//! This module holds the building blocks every subsystem depends on.
//! Content is configured via `ContentBundle` rather than hardcoded.

pub mod config;
pub mod error;
pub mod progress;
pub mod rng;

pub use config::{ContentBundle, GameSettings, StageDefinition, ValidatedContent};
pub use error::{ContentError, PlayRejection, StoreError};
pub use progress::{MemoryStore, ProgressSnapshot, ProgressStore};
pub use rng::{GameRng, GameRngState};
