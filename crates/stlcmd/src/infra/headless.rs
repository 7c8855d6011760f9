//! In-memory host implementations.
//!
//! These stand in for the CAD application so the whole command pipeline
//! can run (and be tested) outside the host process: documents become
//! plain maps, the folder dialog answers from a script, and the export
//! engine writes a minimal ASCII STL.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::model::BodyRef;
use crate::infra::host::{
    AttributeBag, DesignContext, ExportCapability, FolderDialog, Host, InputSurface, MeshQuality,
    Notifier, Severity, StlExportRequest,
};

/// Attribute storage keyed by `(group, key)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttributeBag {
    entries: HashMap<(String, String), String>,
}

impl MemoryAttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AttributeBag for MemoryAttributeBag {
    fn get(&self, group: &str, key: &str) -> Option<String> {
        self.entries.get(&(group.to_owned(), key.to_owned())).cloned()
    }

    fn set(&mut self, group: &str, key: &str, value: &str) {
        self.entries
            .insert((group.to_owned(), key.to_owned()), value.to_owned());
    }

    fn remove(&mut self, group: &str, key: &str) -> bool {
        self.entries
            .remove(&(group.to_owned(), key.to_owned()))
            .is_some()
    }
}

#[derive(Debug, Clone)]
struct BodyRecord {
    name: String,
    parent_component: Option<String>,
    alive: bool,
}

/// One recorded call against the stub export engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExport {
    pub body_id: String,
    pub target_path: PathBuf,
    pub quality: MeshQuality,
    pub send_to_print_utility: bool,
}

/// Export engine stand-in that writes a minimal ASCII STL per job.
#[derive(Debug, Default)]
pub struct StubStlExporter {
    rejected: Vec<PathBuf>,
    exports: Vec<RecordedExport>,
}

impl StubStlExporter {
    /// Make every job targeting `path` report failure.
    pub fn reject_path(&mut self, path: impl Into<PathBuf>) {
        self.rejected.push(path.into());
    }

    /// Every call seen so far, in order.
    pub fn exports(&self) -> &[RecordedExport] {
        &self.exports
    }
}

impl ExportCapability for StubStlExporter {
    fn export_stl(&mut self, request: &StlExportRequest<'_>) -> bool {
        self.exports.push(RecordedExport {
            body_id: request.body.id().to_owned(),
            target_path: request.target_path.to_path_buf(),
            quality: request.quality,
            send_to_print_utility: request.send_to_print_utility,
        });
        if self.rejected.iter().any(|path| path == request.target_path) {
            return false;
        }
        let name = request.body.id();
        let contents = format!("solid {name}\nendsolid {name}\n");
        fs::write(request.target_path, contents).is_ok()
    }
}

/// Design context backed by plain maps.
#[derive(Debug, Default)]
pub struct HeadlessDesign {
    bodies: HashMap<String, BodyRecord>,
    next_id: u32,
    attributes: MemoryAttributeBag,
    exporter: Option<StubStlExporter>,
}

impl HeadlessDesign {
    pub fn new() -> Self {
        Self {
            exporter: Some(StubStlExporter::default()),
            ..Self::default()
        }
    }

    /// A design whose export engine is unavailable.
    pub fn without_export_capability() -> Self {
        Self::default()
    }

    /// Register a body and hand back its weak handle.
    pub fn add_body(&mut self, name: &str, parent_component: Option<&str>) -> BodyRef {
        self.next_id += 1;
        let id = format!("body-{}", self.next_id);
        self.bodies.insert(
            id.clone(),
            BodyRecord {
                name: name.to_owned(),
                parent_component: parent_component.map(str::to_owned),
                alive: true,
            },
        );
        BodyRef::new(id)
    }

    /// Simulate the host deleting the object behind a handle.
    pub fn invalidate_body(&mut self, body: &BodyRef) {
        if let Some(record) = self.bodies.get_mut(body.id()) {
            record.alive = false;
        }
    }

    pub fn exporter_mut(&mut self) -> Option<&mut StubStlExporter> {
        self.exporter.as_mut()
    }

    fn record(&self, body: &BodyRef) -> Option<&BodyRecord> {
        self.bodies.get(body.id()).filter(|record| record.alive)
    }
}

impl DesignContext for HeadlessDesign {
    fn body_name(&self, body: &BodyRef) -> Option<String> {
        self.record(body).map(|record| record.name.clone())
    }

    fn parent_component_name(&self, body: &BodyRef) -> Option<String> {
        self.record(body)
            .and_then(|record| record.parent_component.clone())
    }

    fn attributes(&self) -> &dyn AttributeBag {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut dyn AttributeBag {
        &mut self.attributes
    }

    fn export_capability(&mut self) -> Option<&mut dyn ExportCapability> {
        self.exporter
            .as_mut()
            .map(|exporter| exporter as &mut dyn ExportCapability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Widget {
    Selection(Vec<BodyRef>),
    Text(String),
    Toggle(bool),
    Trigger,
    Display(String),
}

/// Input surface backed by a widget map.
#[derive(Debug, Default)]
pub struct HeadlessInputs {
    widgets: HashMap<String, Widget>,
}

impl HeadlessInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a widget to simulate a missing or broken input.
    pub fn remove(&mut self, id: &str) {
        self.widgets.remove(id);
    }
}

impl InputSurface for HeadlessInputs {
    fn add_selection_input(&mut self, id: &str, _label: &str, _tooltip: &str) -> bool {
        self.widgets
            .insert(id.to_owned(), Widget::Selection(Vec::new()));
        true
    }

    fn add_string_input(&mut self, id: &str, _label: &str, initial: &str) -> bool {
        self.widgets
            .insert(id.to_owned(), Widget::Text(initial.to_owned()));
        true
    }

    fn add_bool_input(&mut self, id: &str, _label: &str, initial: bool) -> bool {
        self.widgets.insert(id.to_owned(), Widget::Toggle(initial));
        true
    }

    fn add_trigger_input(&mut self, id: &str, _label: &str, _tooltip: &str) -> bool {
        self.widgets.insert(id.to_owned(), Widget::Trigger);
        true
    }

    fn add_text_display(&mut self, id: &str, initial: &str) -> bool {
        self.widgets
            .insert(id.to_owned(), Widget::Display(initial.to_owned()));
        true
    }

    fn string_value(&self, id: &str) -> Option<String> {
        match self.widgets.get(id) {
            Some(Widget::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn set_string_value(&mut self, id: &str, value: &str) -> bool {
        match self.widgets.get_mut(id) {
            Some(Widget::Text(current)) => {
                *current = value.to_owned();
                true
            }
            _ => false,
        }
    }

    fn bool_value(&self, id: &str) -> Option<bool> {
        match self.widgets.get(id) {
            Some(Widget::Toggle(value)) => Some(*value),
            _ => None,
        }
    }

    fn set_bool_value(&mut self, id: &str, value: bool) -> bool {
        match self.widgets.get_mut(id) {
            Some(Widget::Toggle(current)) => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    fn text_display(&self, id: &str) -> Option<String> {
        match self.widgets.get(id) {
            Some(Widget::Display(text)) => Some(text.clone()),
            _ => None,
        }
    }

    fn set_text_display(&mut self, id: &str, text: &str) -> bool {
        match self.widgets.get_mut(id) {
            Some(Widget::Display(current)) => {
                *current = text.to_owned();
                true
            }
            _ => false,
        }
    }

    fn selected_bodies(&self, id: &str) -> Option<Vec<BodyRef>> {
        match self.widgets.get(id) {
            Some(Widget::Selection(bodies)) => Some(bodies.clone()),
            _ => None,
        }
    }

    fn set_selected_bodies(&mut self, id: &str, bodies: &[BodyRef]) -> bool {
        match self.widgets.get_mut(id) {
            Some(Widget::Selection(current)) => {
                *current = bodies.to_vec();
                true
            }
            _ => false,
        }
    }

    fn is_valid(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }
}

/// Folder dialog answering from a scripted queue; an empty queue cancels.
#[derive(Debug, Default)]
pub struct ScriptedFolderDialog {
    responses: VecDeque<Option<PathBuf>>,
}

impl ScriptedFolderDialog {
    pub fn accept(&mut self, folder: impl Into<PathBuf>) {
        self.responses.push_back(Some(folder.into()));
    }

    pub fn cancel(&mut self) {
        self.responses.push_back(None);
    }
}

impl FolderDialog for ScriptedFolderDialog {
    fn pick_folder(&mut self, _title: &str, _initial: &Path) -> Option<PathBuf> {
        self.responses.pop_front().flatten()
    }
}

/// Captured notification for later assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, title: &str, message: &str, severity: Severity) {
        tracing::debug!(title, message, severity = ?severity, "notification");
        self.messages.push(Notification {
            title: title.to_owned(),
            message: message.to_owned(),
            severity,
        });
    }
}

/// Complete in-memory host.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub design: Option<HeadlessDesign>,
    pub dialog: ScriptedFolderDialog,
    pub notifier: RecordingNotifier,
}

impl HeadlessHost {
    pub fn with_design(design: HeadlessDesign) -> Self {
        Self {
            design: Some(design),
            ..Self::default()
        }
    }

    /// A host with no open document.
    pub fn without_document() -> Self {
        Self::default()
    }

    pub fn design_mut(&mut self) -> Option<&mut HeadlessDesign> {
        self.design.as_mut()
    }
}

impl Host for HeadlessHost {
    fn active_design(&mut self) -> Option<&mut dyn DesignContext> {
        self.design
            .as_mut()
            .map(|design| design as &mut dyn DesignContext)
    }

    fn folder_dialog(&mut self) -> &mut dyn FolderDialog {
        &mut self.dialog
    }

    fn notifier(&mut self) -> &mut dyn Notifier {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_bag_round_trips_values() {
        let mut bag = MemoryAttributeBag::new();
        bag.set("group", "key", "value");
        assert_eq!(bag.get("group", "key").as_deref(), Some("value"));
        assert!(bag.remove("group", "key"));
        assert!(bag.get("group", "key").is_none());
        assert!(!bag.remove("group", "key"));
    }

    #[test]
    fn widgets_reject_type_confusion() {
        let mut inputs = HeadlessInputs::new();
        inputs.add_string_input("suffix", "Suffix", "");
        assert!(inputs.bool_value("suffix").is_none());
        assert!(!inputs.set_bool_value("suffix", true));
        assert!(inputs.is_valid("suffix"));
        assert!(!inputs.is_valid("missing"));
    }

    #[test]
    fn stale_bodies_stop_resolving() {
        let mut design = HeadlessDesign::new();
        let body = design.add_body("Cube", Some("Assem1"));
        assert_eq!(design.body_name(&body).as_deref(), Some("Cube"));

        design.invalidate_body(&body);
        assert!(design.body_name(&body).is_none());
        assert!(design.parent_component_name(&body).is_none());
    }

    #[test]
    fn scripted_dialog_answers_in_order_then_cancels() {
        let mut dialog = ScriptedFolderDialog::default();
        dialog.accept("/tmp/out");
        dialog.cancel();

        assert_eq!(
            dialog.pick_folder("t", Path::new(".")),
            Some(PathBuf::from("/tmp/out"))
        );
        assert_eq!(dialog.pick_folder("t", Path::new(".")), None);
        assert_eq!(dialog.pick_folder("t", Path::new(".")), None);
    }
}
