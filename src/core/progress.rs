//! Player progress across sessions.
//!
//! The engine only decides *what* is persisted. Where it goes is up to the
//! `ProgressStore` the host supplies.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Persisted progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSnapshot {
    pub cleared_stage_ids: BTreeSet<String>,
    pub per_stage_high_score: BTreeMap<String, i64>,
    pub global_high_score: i64,
}

impl ProgressSnapshot {
    /// Fold a finished stage into the snapshot.
    ///
    /// Returns true if either high score improved.
    pub fn record(&mut self, stage_id: &str, score: i64, cleared: bool) -> bool {
        if cleared {
            self.cleared_stage_ids.insert(stage_id.to_string());
        }

        let best = self.per_stage_high_score.entry(stage_id.to_string()).or_insert(0);
        let stage_improved = score > *best;
        if stage_improved {
            *best = score;
        }

        let global_improved = score > self.global_high_score;
        if global_improved {
            self.global_high_score = score;
        }

        stage_improved || global_improved
    }

    #[must_use]
    pub fn is_cleared(&self, stage_id: &str) -> bool {
        self.cleared_stage_ids.contains(stage_id)
    }

    #[must_use]
    pub fn high_score(&self, stage_id: &str) -> i64 {
        self.per_stage_high_score.get(stage_id).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Backing store for progress.
pub trait ProgressStore {
    fn load(&self) -> Result<ProgressSnapshot, StoreError>;
    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), StoreError>;
}

/// Keeps progress in memory; useful for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: ProgressSnapshot,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<ProgressSnapshot, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        self.snapshot = snapshot.clone();
        self.saves += 1;
        Ok(())
    }
}
