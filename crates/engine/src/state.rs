//! Cadence state: the current step position and its bound, persisted
//! across runs.
//!
//! This is the only cross-run persistent entity. It is read once at run
//! start, advanced by exactly one step at run end, and rewritten
//! wholesale.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CadenceError;

/// Persisted cadence record.
///
/// The serde names mirror the on-disk JSON record (`POS`, `MAX`,
/// `SUBJECTS`, `PATHS`) so existing state files keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadenceState {
    /// Current step, zero-based.
    #[serde(rename = "POS")]
    pub position: u32,

    /// Exclusive upper bound: the number of steps in the cadence.
    #[serde(rename = "MAX")]
    pub limit: u32,

    /// One subject template per step.
    #[serde(rename = "SUBJECTS")]
    pub subjects: Vec<String>,

    /// One body template file name per step, relative to the sequence
    /// directory.
    #[serde(rename = "PATHS")]
    pub paths: Vec<String>,
}

impl CadenceState {
    /// Terminal: every step of the cadence has been dispatched.
    pub fn is_complete(&self) -> bool {
        self.position >= self.limit
    }

    /// Advance by exactly one step. Called once per completed run,
    /// unconditionally, whatever the per-recipient outcomes were.
    pub fn advance(&mut self) {
        debug_assert!(self.position < self.limit);
        self.position += 1;
    }

    /// Semantic validation of a freshly loaded record.
    fn validate(&self) -> Result<(), CadenceError> {
        if self.position > self.limit {
            return Err(CadenceError::StateCorrupt(format!(
                "position {} exceeds limit {}",
                self.position, self.limit
            )));
        }
        if (self.subjects.len() as u32) < self.limit {
            return Err(CadenceError::StateCorrupt(format!(
                "{} subjects for {} steps",
                self.subjects.len(),
                self.limit
            )));
        }
        if (self.paths.len() as u32) < self.limit {
            return Err(CadenceError::StateCorrupt(format!(
                "{} template paths for {} steps",
                self.paths.len(),
                self.limit
            )));
        }
        Ok(())
    }
}

/// File-backed store for the cadence record.
///
/// `save` writes the whole record to a sibling temp file and renames it
/// over the old one, so a crash never leaves a partially written record
/// visible to the next run.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load and validate the cadence record.
    pub fn load(&self) -> Result<CadenceState, CadenceError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            CadenceError::StateCorrupt(format!("{}: {e}", self.path.display()))
        })?;
        let state: CadenceState = serde_json::from_str(&raw).map_err(|e| {
            CadenceError::StateCorrupt(format!("{}: {e}", self.path.display()))
        })?;
        state.validate()?;
        Ok(state)
    }

    /// Rewrite the whole record. The caller only does this after the
    /// dispatch phase has fully completed, so a crash mid-run can be
    /// retried without double-advancing the position.
    pub fn save(&self, state: &CadenceState) -> Result<(), CadenceError> {
        let body = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
