//! Domain models for bodies, parameter snapshots, and export tasks.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::FailureReason;

/// Opaque handle to a solid body owned by the host document.
///
/// The host assigns the identifier and keeps ownership of the body. The
/// handle is weak: it must be re-resolved through
/// [`DesignContext`](crate::infra::host::DesignContext) before every use,
/// and resolution can fail at any time once the body is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyRef {
    id: String,
}

impl BodyRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Host-assigned identifier backing this handle.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory command parameters derived from the current UI state.
///
/// One live snapshot exists per command invocation. It is rebuilt from the
/// inputs on every validation and commit, handed read-only to the task
/// generator, and its durable subset is written to the document attributes
/// when execution finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSnapshot {
    pub output_folder: PathBuf,
    pub file_name_prefix: String,
    pub file_name_suffix: String,
    pub file_name_separator: String,
    pub include_component_name: bool,
    pub overwrite_existing: bool,
    pub selected_bodies: Vec<BodyRef>,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::new(),
            file_name_prefix: String::new(),
            file_name_suffix: String::new(),
            file_name_separator: "_".to_owned(),
            include_component_name: true,
            overwrite_existing: true,
            selected_bodies: Vec::new(),
        }
    }
}

/// One planned body-to-file export unit.
///
/// Created by the task generator, consumed exactly once by the executor,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTask {
    pub target_path: PathBuf,
    pub body: BodyRef,
    pub overwrite_allowed: bool,
}

/// Per-task result after attempting an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ExportOutcome {
    Succeeded,
    SkippedExisting,
    Failed { reason: FailureReason },
}

impl ExportOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExportOutcome::Failed { .. })
    }
}
