//! Command lifecycle controller wiring host UI events to the pipeline.
//!
//! The host delivers every event on one thread; nothing here suspends.
//! One controller instance owns the single live [`ParameterSnapshot`] for
//! its command invocation and exposes a named method per host callback
//! instead of a family of handler objects.

use std::fs;
use std::path::PathBuf;

use crate::app::export::{self, ExportReport};
use crate::app::store::ParameterStore;
use crate::app::tasks;
use crate::app::validate;
use crate::domain::errors::CommandError;
use crate::domain::model::{ExportOutcome, ParameterSnapshot};
use crate::infra::config::Config;
use crate::infra::host::{Host, InputSurface, Severity};

/// Stable widget identifiers used on the input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputIds {
    pub bodies: String,
    pub output_folder_trigger: String,
    pub output_folder_display: String,
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
    pub overwrite: String,
    pub include_component_name: String,
}

impl Default for InputIds {
    fn default() -> Self {
        Self {
            bodies: "bodies".into(),
            output_folder_trigger: "outputFolderTrigger".into(),
            output_folder_display: "outputFolder".into(),
            prefix: "fileNamePrefix".into(),
            suffix: "fileNameSuffix".into(),
            separator: "fileNameSeparator".into(),
            overwrite: "overwriteExisting".into(),
            include_component_name: "includeComponentName".into(),
        }
    }
}

/// Static configuration for one command variant.
///
/// Variants of the command differ only in widget ids, titles, defaults,
/// and report verbosity, so they are all instances of this struct rather
/// than separate controller types.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    pub ids: InputIds,
    pub dialog_title: String,
    pub error_title: String,
    pub report_title: String,
    pub notify_failures: bool,
    pub notify_skips: bool,
    /// Snapshot pushed into the inputs on activation, before any stored
    /// attributes overlay it.
    pub initial: ParameterSnapshot,
}

impl CommandConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ids: InputIds::default(),
            dialog_title: "Select Output Folder".into(),
            error_title: "STL Export".into(),
            report_title: "STL Export".into(),
            notify_failures: config.report.notify_failures(),
            notify_skips: config.report.notify_skips(),
            initial: config.initial_snapshot(),
        }
    }
}

/// Lifecycle states of the modal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Created,
    Activated,
    Executed,
    Destroyed,
}

/// Event-driven controller owning the live parameter snapshot.
pub struct CommandController {
    config: CommandConfig,
    store: ParameterStore,
    snapshot: ParameterSnapshot,
    state: CommandState,
}

impl CommandController {
    pub fn new(config: CommandConfig) -> Self {
        let snapshot = config.initial.clone();
        Self {
            config,
            store: ParameterStore::new(),
            snapshot,
            state: CommandState::Created,
        }
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// `Created -> Activated`: build the widgets, restore the persisted
    /// parameter subset, and push the resulting snapshot into the inputs.
    pub fn activate(&mut self, host: &mut dyn Host, inputs: &mut dyn InputSurface) {
        if self.state == CommandState::Destroyed {
            tracing::debug!(state = ?self.state, "activate ignored");
            return;
        }

        self.build_inputs(inputs);
        let restored = match host.active_design() {
            Some(design) => {
                self.store.load(&mut self.snapshot, design.attributes());
                true
            }
            None => false,
        };
        if !restored {
            host.notifier().notify(
                &self.config.error_title,
                &CommandError::NoActiveDesign.to_string(),
                Severity::Critical,
            );
        }
        self.push_snapshot(inputs);
        self.state = CommandState::Activated;
        tracing::debug!("command activated");
    }

    /// Self-loop on the active states. Only the folder trigger reacts
    /// here; every other input is picked up by the next validation pass.
    pub fn input_changed(
        &mut self,
        changed_id: &str,
        host: &mut dyn Host,
        inputs: &mut dyn InputSurface,
    ) {
        if !self.is_live() {
            tracing::debug!(state = ?self.state, changed_id, "input change ignored");
            return;
        }
        if changed_id != self.config.ids.output_folder_trigger {
            return;
        }

        let current = inputs
            .text_display(&self.config.ids.output_folder_display)
            .filter(|text| !text.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.initial.output_folder.clone());

        // Cancellation leaves the display field untouched.
        if let Some(folder) = host
            .folder_dialog()
            .pick_folder(&self.config.dialog_title, &current)
        {
            inputs.set_text_display(
                &self.config.ids.output_folder_display,
                &folder.display().to_string(),
            );
        }
    }

    /// Commit gate, re-evaluated by the host on every input change.
    /// Unreadable widgets count as invalid rather than erroring.
    pub fn validate(&mut self, inputs: &dyn InputSurface) -> bool {
        if !self.is_live() {
            return false;
        }
        match self.read_snapshot(inputs) {
            Ok(snapshot) => {
                let valid = validate::snapshot_is_valid(&snapshot);
                self.snapshot = snapshot;
                valid
            }
            Err(err) => {
                tracing::debug!(error = %err, "inputs not readable");
                false
            }
        }
    }

    /// `Activated -> Executed`: run the full pipeline and persist the
    /// parameters. Re-entrant: a second commit re-reads the inputs and
    /// re-runs everything from snapshot to outcomes.
    ///
    /// All notifications are rendered here; the report is returned so a
    /// host can additionally present its own result UI.
    pub fn execute(
        &mut self,
        host: &mut dyn Host,
        inputs: &dyn InputSurface,
    ) -> Option<ExportReport> {
        if !self.is_live() {
            tracing::debug!(state = ?self.state, "execute ignored");
            return None;
        }
        match self.run_pipeline(host, inputs) {
            Ok(report) => {
                self.state = CommandState::Executed;
                self.report_outcomes(host, &report);
                Some(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, class = ?err.class(), "command execution aborted");
                host.notifier()
                    .notify(&self.config.error_title, &err.to_string(), Severity::Critical);
                None
            }
        }
    }

    /// `-> Destroyed`: release the snapshot; later events are no-ops.
    pub fn destroy(&mut self) {
        self.snapshot = self.config.initial.clone();
        self.snapshot.selected_bodies.clear();
        self.state = CommandState::Destroyed;
        tracing::debug!("command destroyed");
    }

    fn is_live(&self) -> bool {
        matches!(self.state, CommandState::Activated | CommandState::Executed)
    }

    fn run_pipeline(
        &mut self,
        host: &mut dyn Host,
        inputs: &dyn InputSurface,
    ) -> Result<ExportReport, CommandError> {
        let snapshot = self.read_snapshot(inputs)?;
        if !validate::snapshot_is_valid(&snapshot) {
            return Err(if snapshot.selected_bodies.is_empty() {
                CommandError::EmptySelection
            } else {
                CommandError::UnresolvableFolder(snapshot.output_folder.clone())
            });
        }
        self.snapshot = snapshot;

        if !self.snapshot.output_folder.exists() {
            fs::create_dir_all(&self.snapshot.output_folder).map_err(|source| {
                CommandError::CreateFolder {
                    path: self.snapshot.output_folder.clone(),
                    source,
                }
            })?;
        }

        let tasks = {
            let design = host.active_design().ok_or(CommandError::NoActiveDesign)?;
            tasks::generate(&self.snapshot, &*design)?
        };
        tracing::info!(
            tasks = tasks.len(),
            folder = %self.snapshot.output_folder.display(),
            "starting export run"
        );

        let report = export::execute(&tasks, host.active_design())?;

        // An attempted execution persists the parameters even when some
        // tasks failed.
        if let Some(design) = host.active_design() {
            self.store.save(&self.snapshot, design.attributes_mut());
        }

        Ok(report)
    }

    fn report_outcomes(&self, host: &mut dyn Host, report: &ExportReport) {
        for result in &report.results {
            match &result.outcome {
                ExportOutcome::Failed { reason } if self.config.notify_failures => {
                    host.notifier().notify(
                        &self.config.error_title,
                        &format!("{}: {reason}", result.target_path.display()),
                        Severity::Critical,
                    );
                }
                ExportOutcome::SkippedExisting if self.config.notify_skips => {
                    host.notifier().notify(
                        &self.config.report_title,
                        &format!("{}: already exists, skipped", result.target_path.display()),
                        Severity::Info,
                    );
                }
                _ => {}
            }
        }
        host.notifier().notify(
            &self.config.report_title,
            &report.summary(),
            Severity::Info,
        );
        tracing::info!(
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "export run finished"
        );
    }

    fn build_inputs(&self, inputs: &mut dyn InputSurface) {
        let ids = &self.config.ids;
        inputs.add_selection_input(
            &ids.bodies,
            "Select Bodies",
            "Select solid bodies to export to STL files",
        );
        inputs.add_trigger_input(
            &ids.output_folder_trigger,
            "Output Folder",
            "Select the output folder",
        );
        inputs.add_text_display(
            &ids.output_folder_display,
            &self.config.initial.output_folder.display().to_string(),
        );
        inputs.add_string_input(
            &ids.prefix,
            "File Name Prefix",
            &self.config.initial.file_name_prefix,
        );
        inputs.add_string_input(
            &ids.suffix,
            "File Name Suffix",
            &self.config.initial.file_name_suffix,
        );
        inputs.add_string_input(
            &ids.separator,
            "File Name Separator",
            &self.config.initial.file_name_separator,
        );
        inputs.add_bool_input(
            &ids.overwrite,
            "Overwrite Existing Files",
            self.config.initial.overwrite_existing,
        );
        inputs.add_bool_input(
            &ids.include_component_name,
            "Include Component Name",
            self.config.initial.include_component_name,
        );
    }

    fn push_snapshot(&self, inputs: &mut dyn InputSurface) {
        let ids = &self.config.ids;
        inputs.set_selected_bodies(&ids.bodies, &self.snapshot.selected_bodies);
        inputs.set_text_display(
            &ids.output_folder_display,
            &self.snapshot.output_folder.display().to_string(),
        );
        inputs.set_string_value(&ids.prefix, &self.snapshot.file_name_prefix);
        inputs.set_string_value(&ids.suffix, &self.snapshot.file_name_suffix);
        inputs.set_string_value(&ids.separator, &self.snapshot.file_name_separator);
        inputs.set_bool_value(&ids.overwrite, self.snapshot.overwrite_existing);
        inputs.set_bool_value(
            &ids.include_component_name,
            self.snapshot.include_component_name,
        );
    }

    /// Re-read every input into a fresh snapshot. The bodies selector and
    /// the folder display are required; optional widgets keep the
    /// previous value when absent.
    fn read_snapshot(&self, inputs: &dyn InputSurface) -> Result<ParameterSnapshot, CommandError> {
        let ids = &self.config.ids;
        let mut snapshot = self.snapshot.clone();

        snapshot.selected_bodies = inputs
            .selected_bodies(&ids.bodies)
            .filter(|_| inputs.is_valid(&ids.bodies))
            .ok_or_else(|| CommandError::InvalidWidget(ids.bodies.clone()))?;
        snapshot.output_folder = inputs
            .text_display(&ids.output_folder_display)
            .filter(|_| inputs.is_valid(&ids.output_folder_display))
            .map(PathBuf::from)
            .ok_or_else(|| CommandError::InvalidWidget(ids.output_folder_display.clone()))?;

        if let Some(prefix) = inputs.string_value(&ids.prefix) {
            snapshot.file_name_prefix = prefix;
        }
        if let Some(suffix) = inputs.string_value(&ids.suffix) {
            snapshot.file_name_suffix = suffix;
        }
        if let Some(separator) = inputs.string_value(&ids.separator) {
            snapshot.file_name_separator = separator;
        }
        if let Some(overwrite) = inputs.bool_value(&ids.overwrite) {
            snapshot.overwrite_existing = overwrite;
        }
        if let Some(include) = inputs.bool_value(&ids.include_component_name) {
            snapshot.include_component_name = include;
        }
        Ok(snapshot)
    }
}
