//! Host collaborator traits.
//!
//! The CAD application owns documents, input widgets, dialogs, and the STL
//! export engine; the core consumes them through these seams as black
//! boxes. All calls are synchronous and arrive on the host's UI thread.
//! The in-memory implementations in [`crate::infra::headless`] stand in
//! for the host outside the CAD process.

use std::path::{Path, PathBuf};

use crate::domain::model::BodyRef;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Critical,
}

/// Modal message surface provided by the host.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str, severity: Severity);
}

/// Synchronous modal folder chooser.
pub trait FolderDialog {
    /// Returns the accepted folder, or `None` when the user cancels.
    fn pick_folder(&mut self, title: &str, initial: &Path) -> Option<PathBuf>;
}

/// Durable string key/value attributes scoped to the active document.
pub trait AttributeBag {
    fn get(&self, group: &str, key: &str) -> Option<String>;
    fn set(&mut self, group: &str, key: &str, value: &str);
    fn remove(&mut self, group: &str, key: &str) -> bool;
}

/// Mesh refinement level passed to the host export engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshQuality {
    Low,
    Medium,
    #[default]
    High,
}

/// One export job handed to the host.
#[derive(Debug)]
pub struct StlExportRequest<'a> {
    pub body: &'a BodyRef,
    pub target_path: &'a Path,
    pub quality: MeshQuality,
    pub send_to_print_utility: bool,
}

/// The host's STL materialization capability.
pub trait ExportCapability {
    /// Synchronously produce an STL file at the requested path.
    /// Returns `false` when the host rejects or fails the job.
    fn export_stl(&mut self, request: &StlExportRequest<'_>) -> bool;
}

/// Active design context: body resolution plus document-scoped services.
///
/// Body handles are weak; every accessor re-resolves and returns `None`
/// once the underlying object is gone.
pub trait DesignContext {
    /// Current name of the body, or `None` once the reference went stale.
    fn body_name(&self, body: &BodyRef) -> Option<String>;

    /// Name of the parent component, or `None` when the body has no
    /// resolvable parent.
    fn parent_component_name(&self, body: &BodyRef) -> Option<String>;

    fn attributes(&self) -> &dyn AttributeBag;

    fn attributes_mut(&mut self) -> &mut dyn AttributeBag;

    /// The export engine, or `None` when the host cannot provide one.
    fn export_capability(&mut self) -> Option<&mut dyn ExportCapability>;
}

/// Identifier-addressed command input widgets exposed by the host UI.
///
/// Declarations and setters return `false` when the widget is missing or
/// of the wrong type; getters return `None` in the same situation.
pub trait InputSurface {
    fn add_selection_input(&mut self, id: &str, label: &str, tooltip: &str) -> bool;
    fn add_string_input(&mut self, id: &str, label: &str, initial: &str) -> bool;
    fn add_bool_input(&mut self, id: &str, label: &str, initial: bool) -> bool;
    fn add_trigger_input(&mut self, id: &str, label: &str, tooltip: &str) -> bool;
    fn add_text_display(&mut self, id: &str, initial: &str) -> bool;

    fn string_value(&self, id: &str) -> Option<String>;
    fn set_string_value(&mut self, id: &str, value: &str) -> bool;

    fn bool_value(&self, id: &str) -> Option<bool>;
    fn set_bool_value(&mut self, id: &str, value: bool) -> bool;

    fn text_display(&self, id: &str) -> Option<String>;
    fn set_text_display(&mut self, id: &str, text: &str) -> bool;

    fn selected_bodies(&self, id: &str) -> Option<Vec<BodyRef>>;
    fn set_selected_bodies(&mut self, id: &str, bodies: &[BodyRef]) -> bool;

    /// Host-side validity flag for a widget.
    fn is_valid(&self, id: &str) -> bool;
}

/// Top-level host facade handed to the controller with every event.
pub trait Host {
    /// The active design, or `None` when no document is open.
    fn active_design(&mut self) -> Option<&mut dyn DesignContext>;

    fn folder_dialog(&mut self) -> &mut dyn FolderDialog;

    fn notifier(&mut self) -> &mut dyn Notifier;
}
