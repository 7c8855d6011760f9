//! Durable parameter persistence on the document's attribute bag.

use std::path::PathBuf;

use crate::domain::model::ParameterSnapshot;
use crate::infra::host::AttributeBag;

/// Attribute group holding every durable key.
pub const ATTRIBUTE_GROUP: &str = "StlExportParameters";

const KEY_OUTPUT_FOLDER: &str = "outputFolder";
const KEY_PREFIX: &str = "fileNamePrefix";
const KEY_SUFFIX: &str = "fileNameSuffix";
const KEY_SEPARATOR: &str = "fileNameSeparator";
const KEY_OVERWRITE: &str = "overwriteExisting";
const KEY_INCLUDE_COMPONENT: &str = "includeComponentName";

/// Reads and writes the durable subset of a [`ParameterSnapshot`].
///
/// Only strings live in the bag; booleans are the literals `"true"` and
/// `"false"`. Loading leaves a field untouched when its key is missing,
/// so partial or absent attribute sets fall back to defaults instead of
/// erroring. The selected bodies are session state and never persisted.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    group: String,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::with_group(ATTRIBUTE_GROUP)
    }

    /// Store under a custom group, for commands that must not share
    /// persisted parameters.
    pub fn with_group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }

    pub fn save(&self, snapshot: &ParameterSnapshot, bag: &mut dyn AttributeBag) {
        bag.set(
            &self.group,
            KEY_OUTPUT_FOLDER,
            &snapshot.output_folder.display().to_string(),
        );
        bag.set(&self.group, KEY_PREFIX, &snapshot.file_name_prefix);
        bag.set(&self.group, KEY_SUFFIX, &snapshot.file_name_suffix);
        bag.set(&self.group, KEY_SEPARATOR, &snapshot.file_name_separator);
        bag.set(
            &self.group,
            KEY_OVERWRITE,
            bool_literal(snapshot.overwrite_existing),
        );
        bag.set(
            &self.group,
            KEY_INCLUDE_COMPONENT,
            bool_literal(snapshot.include_component_name),
        );
    }

    pub fn load(&self, snapshot: &mut ParameterSnapshot, bag: &dyn AttributeBag) {
        if let Some(folder) = bag.get(&self.group, KEY_OUTPUT_FOLDER) {
            snapshot.output_folder = PathBuf::from(folder);
        }
        if let Some(prefix) = bag.get(&self.group, KEY_PREFIX) {
            snapshot.file_name_prefix = prefix;
        }
        if let Some(suffix) = bag.get(&self.group, KEY_SUFFIX) {
            snapshot.file_name_suffix = suffix;
        }
        if let Some(separator) = bag.get(&self.group, KEY_SEPARATOR) {
            snapshot.file_name_separator = separator;
        }
        if let Some(overwrite) = bag.get(&self.group, KEY_OVERWRITE) {
            snapshot.overwrite_existing = overwrite == "true";
        }
        if let Some(include) = bag.get(&self.group, KEY_INCLUDE_COMPONENT) {
            snapshot.include_component_name = include == "true";
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

fn bool_literal(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
