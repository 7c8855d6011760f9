//! File naming policy for export targets.

use std::path::{Path, PathBuf};

use crate::domain::model::ParameterSnapshot;

/// Options shaping the generated file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
    pub include_component_name: bool,
}

impl NamingOptions {
    pub fn from_snapshot(snapshot: &ParameterSnapshot) -> Self {
        Self {
            prefix: snapshot.file_name_prefix.clone(),
            suffix: snapshot.file_name_suffix.clone(),
            separator: snapshot.file_name_separator.clone(),
            include_component_name: snapshot.include_component_name,
        }
    }
}

/// Assemble the file name for one body.
///
/// Shape: `[prefix][sep]` + (`[component][sep]` when the flag is set and a
/// parent exists) + body name + (`[sep][suffix]` when the suffix is
/// non-empty) + `.stl`, with every space replaced by an underscore.
/// Colliding names are not deduplicated here; the overwrite policy decides
/// at execution time.
pub fn file_name(
    body_name: &str,
    component_name: Option<&str>,
    options: &NamingOptions,
) -> String {
    let mut name = String::with_capacity(64);
    if !options.prefix.is_empty() {
        name.push_str(&options.prefix);
        name.push_str(&options.separator);
    }
    if options.include_component_name
        && let Some(component) = component_name
    {
        name.push_str(component);
        name.push_str(&options.separator);
    }
    name.push_str(body_name);
    if !options.suffix.is_empty() {
        name.push_str(&options.separator);
        name.push_str(&options.suffix);
    }
    name.push_str(".stl");
    name.replace(' ', "_")
}

/// Join the assembled file name to the output folder.
pub fn target_path(
    folder: &Path,
    body_name: &str,
    component_name: Option<&str>,
    options: &NamingOptions,
) -> PathBuf {
    folder.join(file_name(body_name, component_name, options))
}
