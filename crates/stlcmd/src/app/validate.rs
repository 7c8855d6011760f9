//! Snapshot validation gating the command's commit action.

use std::path::Path;

use crate::domain::model::ParameterSnapshot;

/// Pure predicate deciding whether the snapshot can be executed.
///
/// The exact output folder does not have to exist yet; it only needs an
/// existing ancestor so it can be created at execution time. Re-evaluated
/// by the host on every input change.
pub fn snapshot_is_valid(snapshot: &ParameterSnapshot) -> bool {
    if snapshot.selected_bodies.is_empty() {
        return false;
    }
    folder_is_resolvable(&snapshot.output_folder)
}

/// True when the folder or any directory in its ancestry chain exists.
pub fn folder_is_resolvable(folder: &Path) -> bool {
    if folder.as_os_str().is_empty() {
        return false;
    }
    folder
        .ancestors()
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .any(Path::exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::domain::model::BodyRef;

    fn snapshot_with(folder: PathBuf, bodies: usize) -> ParameterSnapshot {
        ParameterSnapshot {
            output_folder: folder,
            selected_bodies: (0..bodies)
                .map(|index| BodyRef::new(format!("body-{index}")))
                .collect(),
            ..ParameterSnapshot::default()
        }
    }

    #[test]
    fn empty_selection_is_invalid_even_with_valid_folder() {
        let temp = tempfile::tempdir().unwrap();
        assert!(!snapshot_is_valid(&snapshot_with(temp.path().into(), 0)));
    }

    #[test]
    fn empty_folder_is_invalid() {
        assert!(!snapshot_is_valid(&snapshot_with(PathBuf::new(), 2)));
    }

    #[test]
    fn missing_leaf_with_existing_ancestor_is_valid() {
        let temp = tempfile::tempdir().unwrap();
        let folder = temp.path().join("new").join("nested");
        assert!(snapshot_is_valid(&snapshot_with(folder, 1)));
    }

    #[test]
    fn folder_without_any_existing_ancestor_is_invalid() {
        let folder = PathBuf::from("no-such-root-stlcmd").join("sub");
        assert!(!snapshot_is_valid(&snapshot_with(folder, 1)));
    }
}
