//! Expanding a validated snapshot into concrete export tasks.

use crate::app::naming::{self, NamingOptions};
use crate::domain::errors::CommandError;
use crate::domain::model::{ExportTask, ParameterSnapshot};
use crate::infra::host::DesignContext;

/// Produce one export task per selected body, in selection order.
///
/// Selection order is load-bearing: it fixes export order, and when two
/// bodies resolve to the same path the task that runs last determines the
/// final file contents. Collisions are not pre-detected.
pub fn generate(
    snapshot: &ParameterSnapshot,
    design: &dyn DesignContext,
) -> Result<Vec<ExportTask>, CommandError> {
    if snapshot.selected_bodies.is_empty() {
        return Err(CommandError::EmptySelection);
    }

    let options = NamingOptions::from_snapshot(snapshot);
    let mut tasks = Vec::with_capacity(snapshot.selected_bodies.len());
    for body in &snapshot.selected_bodies {
        // A stale handle still yields a task, named by its raw id; the
        // executor records it as failed instead of aborting the batch.
        let body_name = design
            .body_name(body)
            .unwrap_or_else(|| body.id().to_owned());
        let component = design.parent_component_name(body);
        let target_path = naming::target_path(
            &snapshot.output_folder,
            &body_name,
            component.as_deref(),
            &options,
        );
        tasks.push(ExportTask {
            target_path,
            body: body.clone(),
            overwrite_allowed: snapshot.overwrite_existing,
        });
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::infra::headless::HeadlessDesign;

    fn snapshot(design: &mut HeadlessDesign, names: &[&str]) -> ParameterSnapshot {
        ParameterSnapshot {
            output_folder: PathBuf::from("/out"),
            selected_bodies: names
                .iter()
                .map(|name| design.add_body(name, Some("Assem1")))
                .collect(),
            ..ParameterSnapshot::default()
        }
    }

    #[test]
    fn one_task_per_body_in_selection_order() {
        let mut design = HeadlessDesign::new();
        let snapshot = snapshot(&mut design, &["Cube", "Sphere", "Cone"]);

        let tasks = generate(&snapshot, &design).unwrap();
        assert_eq!(tasks.len(), 3);
        let paths: Vec<_> = tasks
            .iter()
            .map(|task| task.target_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/out/Assem1_Cube.stl"),
                PathBuf::from("/out/Assem1_Sphere.stl"),
                PathBuf::from("/out/Assem1_Cone.stl"),
            ]
        );
    }

    #[test]
    fn empty_selection_is_reported_not_silent() {
        let design = HeadlessDesign::new();
        let snapshot = ParameterSnapshot {
            output_folder: PathBuf::from("/out"),
            ..ParameterSnapshot::default()
        };
        assert!(matches!(
            generate(&snapshot, &design),
            Err(CommandError::EmptySelection)
        ));
    }

    #[test]
    fn overwrite_flag_propagates_to_every_task() {
        let mut design = HeadlessDesign::new();
        let mut snapshot = snapshot(&mut design, &["Cube", "Sphere"]);
        snapshot.overwrite_existing = false;

        let tasks = generate(&snapshot, &design).unwrap();
        assert!(tasks.iter().all(|task| !task.overwrite_allowed));
    }

    #[test]
    fn colliding_paths_are_kept_in_order() {
        let mut design = HeadlessDesign::new();
        let first = design.add_body("Twin", None);
        let second = design.add_body("Twin", None);
        let snapshot = ParameterSnapshot {
            output_folder: PathBuf::from("/out"),
            selected_bodies: vec![first, second],
            ..ParameterSnapshot::default()
        };

        let tasks = generate(&snapshot, &design).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].target_path, tasks[1].target_path);
    }
}
