//! End-to-end tests for `run-trac-all-longitudinal` with a mock trac-all

mod common;

use std::sync::Arc;

use clap::Parser;

use common::{container, s, MockCommandRunner, SessionFiles, Workspace};
use tracall::application::services::{AuditService, LogKind};
use tracall::application::{LongitudinalInputs, LongitudinalOutputs, RuntimeInfo};
use tracall::cli::{run_longitudinal, LongitudinalArgs};
use tracall::exitcode;
use tracall::infrastructure::traits::RealFileSystem;
use tracall::util::testing::init_test_setup;

const SUFFIX: &str = "trac-all_longitudinal";

fn argv(ws: &Workspace, template: &str, tps: &[SessionFiles]) -> Vec<String> {
    let mut argv = vec![
        "run-trac-all-longitudinal".to_string(),
        "-o".into(),
        s(&ws.outdir()),
        "-p".into(),
        template.into(),
        "-S".into(),
        s(&ws.subjects_dir()),
    ];
    argv.push("-t".into());
    argv.extend(tps.iter().map(|f| f.id.clone()));
    argv.push("-i".into());
    argv.extend(tps.iter().map(|f| s(&f.dwi)));
    argv.push("-b".into());
    argv.extend(tps.iter().map(|f| s(&f.bvals)));
    argv.push("-r".into());
    argv.extend(tps.iter().map(|f| s(&f.bvecs)));
    argv.push("-d".into());
    argv.extend(tps.iter().map(|f| s(&f.bedpostx)));
    argv
}

fn parse(argv: Vec<String>) -> LongitudinalArgs {
    LongitudinalArgs::try_parse_from(argv).unwrap()
}

#[test]
fn given_two_timepoints_when_run_then_order_preserved_everywhere() {
    init_test_setup();
    // Arrange: timepoints deliberately not in lexical order
    let ws = Workspace::new();
    let tps = vec![ws.session("tp2"), ws.session("tp1")];
    let args = parse(argv(&ws, "base", &tps));
    let cmd = Arc::new(MockCommandRunner::new());

    // Act
    let dirs = run_longitudinal(&args, &container(cmd.clone())).unwrap();

    // Assert
    let expected = vec![
        ws.outdir().join("tp2.long.base"),
        ws.outdir().join("tp1.long.base"),
    ];
    assert_eq!(dirs, expected);
    assert_eq!(cmd.stage_flags(), vec!["-prep", "-path"]);

    let dmrirc = &cmd.calls()[0].dmrirc;
    assert!(dmrirc.contains("set subjlist = (tp2 tp1)"), "{}", dmrirc);
    assert!(dmrirc.contains("set baselist = (base base)"), "{}", dmrirc);
    assert!(dmrirc.contains(&format!(
        "set dcmlist = ({} {})",
        s(&tps[0].dwi),
        s(&tps[1].dwi)
    )));

    let audit = AuditService::new(Arc::new(RealFileSystem));
    for dir in &expected {
        let inputs: LongitudinalInputs = audit
            .read(&AuditService::log_path(dir, LogKind::Inputs, SUFFIX))
            .unwrap();
        assert_eq!(inputs, args.inputs());
        assert_eq!(inputs.subject_timepoint_ids, vec!["tp2", "tp1"]);

        let outputs: LongitudinalOutputs = audit
            .read(&AuditService::log_path(dir, LogKind::Outputs, SUFFIX))
            .unwrap();
        assert_eq!(outputs.output_dirs, expected);

        let runtime: RuntimeInfo = audit
            .read(&AuditService::log_path(dir, LogKind::Runtime, SUFFIX))
            .unwrap();
        assert_eq!(runtime.tool, "run-trac-all-longitudinal");
    }
}

#[test]
fn given_two_timepoints_when_run_then_each_long_dir_gets_its_bedpostx() {
    let ws = Workspace::new();
    let tps = vec![ws.session("tp1"), ws.session("tp2")];
    let cmd = Arc::new(MockCommandRunner::new());

    run_longitudinal(&parse(argv(&ws, "base", &tps)), &container(cmd)).unwrap();

    for tp in &tps {
        let link = ws
            .outdir()
            .join(format!("{}.long.base", tp.id))
            .join("dmri.bedpostX");
        assert_eq!(
            std::fs::read_link(&link).unwrap(),
            std::fs::canonicalize(&tp.bedpostx).unwrap()
        );
    }
}

#[test]
fn given_mismatched_list_lengths_when_run_then_rejected_before_trac_all() {
    let ws = Workspace::new();
    let tps = vec![ws.session("tp1"), ws.session("tp2")];
    let mut argv = argv(&ws, "base", &tps);
    // drop the second bvecs file
    let pos = argv.iter().position(|a| *a == s(&tps[1].bvecs)).unwrap();
    argv.remove(pos);
    let cmd = Arc::new(MockCommandRunner::new());

    let err = run_longitudinal(&parse(argv), &container(cmd.clone())).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(err.to_string().contains("bvecss"), "{}", err);
    assert!(cmd.calls().is_empty());
    assert!(!ws.outdir().exists());
}

#[test]
fn given_duplicate_timepoint_when_run_then_rejected() {
    let ws = Workspace::new();
    let tp = ws.session("tp1");
    let cmd = Arc::new(MockCommandRunner::new());

    let err = run_longitudinal(
        &parse(argv(&ws, "base", &[tp.clone(), tp])),
        &container(cmd.clone()),
    )
    .unwrap_err();

    assert!(err.to_string().contains("duplicate timepoint id: tp1"));
    assert!(cmd.calls().is_empty());
}

#[test]
fn given_missing_second_bvals_when_run_then_error_names_that_file() {
    let ws = Workspace::new();
    let tps = vec![ws.session("tp1"), ws.session("tp2")];
    std::fs::remove_file(&tps[1].bvals).unwrap();
    let cmd = Arc::new(MockCommandRunner::new());

    let err = run_longitudinal(&parse(argv(&ws, "base", &tps)), &container(cmd.clone()))
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
    assert!(err.to_string().contains("bvals file not found"), "{}", err);
    assert!(err.to_string().contains(&s(&tps[1].bvals)));
    assert!(cmd.calls().is_empty());
}

#[test]
fn given_failing_prep_when_run_then_path_never_runs() {
    let ws = Workspace::new();
    let tps = vec![ws.session("tp1"), ws.session("tp2")];
    let cmd = Arc::new(MockCommandRunner::failing_on("-prep"));

    let err = run_longitudinal(&parse(argv(&ws, "base", &tps)), &container(cmd.clone()))
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::SOFTWARE);
    assert_eq!(cmd.stage_flags(), vec!["-prep"]);
    assert!(!ws.outdir().join("tp1.long.base").exists());
}
