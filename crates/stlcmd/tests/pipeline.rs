//! End-to-end lifecycle tests driving the controller the way the host
//! does: activate, change inputs, validate, execute, destroy.

use std::fs;
use std::path::Path;

use stlcmd::app::command::{CommandConfig, CommandController, CommandState};
use stlcmd::app::store::ATTRIBUTE_GROUP;
use stlcmd::infra::config::Config;
use stlcmd::infra::headless::{HeadlessDesign, HeadlessHost, HeadlessInputs};
use stlcmd::infra::host::{DesignContext, InputSurface, Severity};

fn controller_with_output(folder: &Path) -> CommandController {
    let mut config = CommandConfig::from_config(&Config::default());
    config.initial.output_folder = folder.to_path_buf();
    CommandController::new(config)
}

fn session(folder: &Path) -> (CommandController, HeadlessHost, HeadlessInputs) {
    let mut controller = controller_with_output(folder);
    let mut host = HeadlessHost::with_design(HeadlessDesign::new());
    let mut inputs = HeadlessInputs::new();
    controller.activate(&mut host, &mut inputs);
    (controller, host, inputs)
}

#[test]
fn full_run_exports_every_selected_body() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let design = host.design_mut().unwrap();
    let cube = design.add_body("Cube", Some("Assem1"));
    let sphere = design.add_body("Round Part", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[cube, sphere]);

    assert!(controller.validate(&inputs));
    let report = controller.execute(&mut host, &inputs).expect("report");

    assert_eq!(controller.state(), CommandState::Executed);
    assert_eq!(report.summary(), "exported 2, skipped 0, failed 0");
    assert!(temp.path().join("Assem1_Cube.stl").exists());
    assert!(temp.path().join("Assem1_Round_Part.stl").exists());

    let last = host.notifier.messages.last().unwrap();
    assert_eq!(last.title, "STL Export");
    assert_eq!(last.message, "exported 2, skipped 0, failed 0");
    assert_eq!(last.severity, Severity::Info);
}

#[test]
fn dialog_choice_redirects_the_output_folder() {
    let temp = tempfile::tempdir().unwrap();
    let chosen = temp.path().join("picked");
    let (mut controller, mut host, mut inputs) = session(temp.path());

    host.dialog.accept(&chosen);
    controller.input_changed("outputFolderTrigger", &mut host, &mut inputs);

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);

    assert!(controller.validate(&inputs));
    controller.execute(&mut host, &inputs).expect("report");
    // The missing leaf folder is created on execution.
    assert!(chosen.join("Assem1_Cube.stl").exists());
}

#[test]
fn overwrite_toggle_skips_existing_files() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);
    inputs.set_bool_value("overwriteExisting", false);

    let target = temp.path().join("Assem1_Cube.stl");
    fs::write(&target, "original contents").unwrap();

    let report = controller.execute(&mut host, &inputs).expect("report");
    assert_eq!(report.summary(), "exported 0, skipped 1, failed 0");
    assert_eq!(fs::read_to_string(&target).unwrap(), "original contents");
}

#[test]
fn stale_body_fails_alone_and_is_notified() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let design = host.design_mut().unwrap();
    let gone = design.add_body("Gone", Some("Assem1"));
    let cube = design.add_body("Cube", Some("Assem1"));
    design.invalidate_body(&gone);
    inputs.set_selected_bodies("bodies", &[gone, cube]);

    let report = controller.execute(&mut host, &inputs).expect("report");
    assert_eq!(report.summary(), "exported 1, skipped 0, failed 1");
    assert!(temp.path().join("Assem1_Cube.stl").exists());

    let failures: Vec<_> = host
        .notifier
        .messages
        .iter()
        .filter(|msg| msg.severity == Severity::Critical)
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("missing body/component"));
}

#[test]
fn second_execution_rereads_the_inputs() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);
    controller.execute(&mut host, &inputs).expect("first run");

    inputs.set_string_value("fileNameSuffix", "v2");
    let report = controller.execute(&mut host, &inputs).expect("second run");

    assert_eq!(controller.state(), CommandState::Executed);
    assert_eq!(report.summary(), "exported 1, skipped 0, failed 0");
    assert!(temp.path().join("Assem1_Cube.stl").exists());
    assert!(temp.path().join("Assem1_Cube_v2.stl").exists());
}

#[test]
fn parameters_persist_into_the_next_invocation() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);
    inputs.set_string_value("fileNameSuffix", "print");
    inputs.set_bool_value("includeComponentName", false);
    controller.execute(&mut host, &inputs).expect("report");

    let bag = host.design_mut().unwrap().attributes();
    assert_eq!(
        bag.get(ATTRIBUTE_GROUP, "fileNameSuffix").as_deref(),
        Some("print")
    );
    assert_eq!(
        bag.get(ATTRIBUTE_GROUP, "includeComponentName").as_deref(),
        Some("false")
    );

    // A fresh invocation on the same document restores the stored values.
    let mut next = controller_with_output(temp.path());
    let mut next_inputs = HeadlessInputs::new();
    next.activate(&mut host, &mut next_inputs);

    assert_eq!(next.snapshot().file_name_suffix, "print");
    assert!(!next.snapshot().include_component_name);
    assert_eq!(
        next_inputs.string_value("fileNameSuffix").as_deref(),
        Some("print")
    );
    assert_eq!(next_inputs.bool_value("includeComponentName"), Some(false));
}

#[test]
fn losing_the_document_before_execution_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let (mut controller, mut host, mut inputs) = session(temp.path());

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);
    host.design = None;

    assert!(controller.execute(&mut host, &inputs).is_none());
    assert_eq!(controller.state(), CommandState::Activated);
    let last = host.notifier.messages.last().unwrap();
    assert_eq!(last.severity, Severity::Critical);
    assert_eq!(last.message, "no active design");
}

#[test]
fn unavailable_export_engine_aborts_before_writing() {
    let temp = tempfile::tempdir().unwrap();
    let mut controller = controller_with_output(temp.path());
    let mut host = HeadlessHost::with_design(HeadlessDesign::without_export_capability());
    let mut inputs = HeadlessInputs::new();
    controller.activate(&mut host, &mut inputs);

    let body = host.design_mut().unwrap().add_body("Cube", Some("Assem1"));
    inputs.set_selected_bodies("bodies", &[body]);

    assert!(controller.execute(&mut host, &inputs).is_none());
    assert!(!temp.path().join("Assem1_Cube.stl").exists());
    let last = host.notifier.messages.last().unwrap();
    assert_eq!(last.severity, Severity::Critical);
}
