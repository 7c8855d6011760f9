//! Domain-specific errors.
//!
//! Everything fatal to an operation is a [`CommandError`]; per-task
//! problems that keep the batch running are [`FailureReason`]s recorded in
//! the export report. Nothing here is thrown as control flow across
//! component boundaries.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Broad error classes the controller uses for reporting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad user input; the command stays open for correction.
    InvalidInput,
    /// The host environment cannot run any task; the operation aborts.
    MissingEnvironment,
}

/// Fatal errors raised by the command pipeline.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no bodies selected")]
    EmptySelection,

    #[error("output folder {} is not resolvable", .0.display())]
    UnresolvableFolder(PathBuf),

    #[error("input '{0}' is missing or invalid")]
    InvalidWidget(String),

    #[error("failed to create output folder {}: {source}", .path.display())]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no active design")]
    NoActiveDesign,

    #[error("export capability is not available")]
    ExportUnavailable,
}

impl CommandError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CommandError::EmptySelection
            | CommandError::UnresolvableFolder(_)
            | CommandError::InvalidWidget(_)
            | CommandError::CreateFolder { .. } => ErrorClass::InvalidInput,
            CommandError::NoActiveDesign | CommandError::ExportUnavailable => {
                ErrorClass::MissingEnvironment
            }
        }
    }
}

/// Non-fatal, per-task failure reasons. The batch continues past these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    #[error("missing body/component")]
    MissingBodyOrComponent,
    #[error("export call failed")]
    ExportCallFailed,
}
