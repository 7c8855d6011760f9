//! Export execution against the host's STL engine.

use std::path::PathBuf;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::errors::{CommandError, FailureReason};
use crate::domain::model::{ExportOutcome, ExportTask};
use crate::infra::host::{DesignContext, MeshQuality, StlExportRequest};

/// Outcome of a single task paired with its target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    pub target_path: PathBuf,
    pub outcome: ExportOutcome,
}

/// Aggregated results of one export run. Never persisted across runs.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub generated_at: String,
    pub results: Vec<TaskResult>,
}

impl ExportReport {
    fn new(results: Vec<TaskResult>) -> Self {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            generated_at,
            results,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.count(|outcome| matches!(outcome, ExportOutcome::Succeeded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ExportOutcome::SkippedExisting))
    }

    pub fn failed(&self) -> usize {
        self.count(ExportOutcome::is_failure)
    }

    /// Results of tasks that failed, for user-facing reporting.
    pub fn failures(&self) -> impl Iterator<Item = &TaskResult> {
        self.results
            .iter()
            .filter(|result| result.outcome.is_failure())
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "exported {}, skipped {}, failed {}",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }

    /// JSON rendering for logs or scripted consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn count(&self, predicate: impl Fn(&ExportOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }
}

/// Run every task in order, aggregating per-task outcomes.
///
/// A missing design or export capability aborts the whole run since no
/// task could ever succeed; everything else is recorded per task and the
/// batch continues. Tasks run strictly in the given order so that later
/// writes win on colliding paths.
pub fn execute(
    tasks: &[ExportTask],
    design: Option<&mut dyn DesignContext>,
) -> Result<ExportReport, CommandError> {
    let design = design.ok_or(CommandError::NoActiveDesign)?;
    if design.export_capability().is_none() {
        return Err(CommandError::ExportUnavailable);
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        let outcome = run_task(task, design)?;
        tracing::debug!(
            path = %task.target_path.display(),
            outcome = ?outcome,
            "export task finished"
        );
        results.push(TaskResult {
            target_path: task.target_path.clone(),
            outcome,
        });
    }
    Ok(ExportReport::new(results))
}

fn run_task(
    task: &ExportTask,
    design: &mut dyn DesignContext,
) -> Result<ExportOutcome, CommandError> {
    if task.target_path.exists() && !task.overwrite_allowed {
        return Ok(ExportOutcome::SkippedExisting);
    }

    // Weak handles are re-validated per task; a stale body or parent must
    // not abort the rest of the batch.
    if design.body_name(&task.body).is_none()
        || design.parent_component_name(&task.body).is_none()
    {
        return Ok(ExportOutcome::Failed {
            reason: FailureReason::MissingBodyOrComponent,
        });
    }

    let request = StlExportRequest {
        body: &task.body,
        target_path: &task.target_path,
        quality: MeshQuality::High,
        send_to_print_utility: false,
    };
    let capability = design
        .export_capability()
        .ok_or(CommandError::ExportUnavailable)?;
    if capability.export_stl(&request) {
        Ok(ExportOutcome::Succeeded)
    } else {
        Ok(ExportOutcome::Failed {
            reason: FailureReason::ExportCallFailed,
        })
    }
}
