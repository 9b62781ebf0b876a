//! Shared types for Vaultpress.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An image reference located on disk and the name it will be published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    /// Absolute path of the source file inside the vault.
    pub absolute_source_path: PathBuf,

    /// Path of the copy, relative to the static images directory.
    pub destination_relative_path: PathBuf,
}

/// Outcome of a batch export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ExportSummary {
    /// Number of notes attempted.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Turn a summary with failures into a `PartialFailure` error.
    pub fn into_result(self) -> Result<Self> {
        if self.failed == 0 {
            Ok(self)
        } else {
            Err(ExportError::PartialFailure {
                failed: self.failed,
                total: self.total(),
            })
        }
    }
}

/// Whether a note is exported alone or as part of a batch.
///
/// Single exports announce each note; batch exports only announce the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportContext {
    #[default]
    Single,
    Batch,
}

impl ExportContext {
    pub fn is_batch(self) -> bool {
        self == ExportContext::Batch
    }
}
