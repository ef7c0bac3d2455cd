//! End-to-end tests for the `validate` command.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use clap::Parser;
use serde_json::{Value, json};
use tempfile::TempDir;
use tracker_cli::cli::{Cli, Command, ValidateArgs};
use tracker_cli::commands::{load_records, run_validate};
use tracker_cli::summary::{conflict_table, summary_table};
use tracker_validate::BatchStatus;

fn snapshot() -> Value {
    json!({
        "organisationUnits": [
            { "uid": "ImspTQPwCqd", "code": "SL", "path": "/ImspTQPwCqd" },
            { "uid": "DiszpKrYNg8", "code": "BO", "path": "/ImspTQPwCqd/DiszpKrYNg8" }
        ],
        "trackedEntityTypes": [
            { "uid": "nEenWmSyUEp", "code": "PERSON", "featureType": "NONE" }
        ],
        "attributes": [
            { "uid": "ruQQnf6rswq", "code": "AGE", "valueType": "INTEGER" }
        ],
        "programStages": [
            {
                "uid": "ZzYYXq4fJie",
                "repeatable": true,
                "validationStrategy": "ON_UPDATE_AND_INSERT",
                "dataElements": [{ "dataElement": "a3kGcGDCuk6", "compulsory": true }]
            }
        ],
        "dataElements": [
            { "uid": "a3kGcGDCuk6", "code": "APGAR", "valueType": "NUMBER" }
        ]
    })
}

fn records() -> Value {
    json!([
        {
            "kind": "trackedEntity",
            "uid": "Kj6vYde4LHh",
            "trackedEntityType": "nEenWmSyUEp",
            "orgUnit": "DiszpKrYNg8",
            "attributes": [{ "attribute": "ruQQnf6rswq", "value": "31" }]
        },
        {
            "kind": "trackedEntity",
            "uid": "Vy4Jlc8yjJQ",
            "trackedEntityType": "nEenWmSyUEp",
            "orgUnit": "DiszpKrYNg8",
            "attributes": [{ "attribute": "ruQQnf6rswq", "value": "forty" }]
        },
        {
            "kind": "event",
            "uid": "Ue2pc3Hd4Xy",
            "programStage": "ZzYYXq4fJie",
            "orgUnit": "DiszpKrYNg8",
            "dataValues": [{ "dataElement": "a3kGcGDCuk6", "value": "9" }]
        }
    ])
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        workspace.write("snapshot.json", &snapshot().to_string());
        workspace.write("records.json", &records().to_string());
        workspace
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn args(&self, extra: &[&str]) -> ValidateArgs {
        let mut argv = vec![
            "tracker-import".to_string(),
            "validate".to_string(),
            path_arg(&self.path("records.json")),
            "--snapshot".to_string(),
            path_arg(&self.path("snapshot.json")),
        ];
        argv.extend(extra.iter().map(|arg| (*arg).to_string()));
        match Cli::try_parse_from(argv).expect("parse arguments").command {
            Command::Validate(args) => args,
            Command::Codes => panic!("expected validate command"),
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn read_json(path: &Path) -> Value {
    let source = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&source).expect("parse output")
}

#[test]
fn validate_writes_report_and_accepted_records() {
    let workspace = Workspace::new();
    let report_path = path_arg(&workspace.path("report.json"));
    let accepted_path = path_arg(&workspace.path("accepted.json"));
    let args = workspace.args(&["--report", &report_path, "--accepted", &accepted_path]);

    let report = run_validate(&args).expect("run validate");
    assert_eq!(report.status, BatchStatus::Warning);
    assert_eq!((report.imported, report.ignored), (2, 1));

    let written = read_json(&workspace.path("report.json"));
    assert_eq!(written["status"], json!("WARNING"));
    assert_eq!(written["outcomes"][1]["reference"], json!("Vy4Jlc8yjJQ"));
    assert_eq!(written["outcomes"][1]["conflicts"][0]["code"], json!("E1007"));

    let accepted = load_records(&workspace.path("accepted.json")).expect("load accepted");
    let uids: Vec<_> = accepted.iter().map(|record| record.uid().to_string()).collect();
    assert_eq!(uids, vec!["Kj6vYde4LHh", "Ue2pc3Hd4Xy"]);
}

#[test]
fn atomic_mode_flag_overrides_config() {
    let workspace = Workspace::new();
    let config = workspace.write("options.toml", "atomic_mode = \"object\"\nthreads = 2\n");
    let config = path_arg(&config);
    let args = workspace.args(&["--config", &config, "--atomic-mode", "all"]);

    let report = run_validate(&args).expect("run validate");
    assert_eq!(report.status, BatchStatus::Error);
    assert_eq!(report.imported, 0);
}

#[test]
fn code_scheme_resolves_references_by_code() {
    let workspace = Workspace::new();
    workspace.write(
        "records.json",
        &json!([{
            "kind": "trackedEntity",
            "uid": "Kj6vYde4LHh",
            "trackedEntityType": "PERSON",
            "orgUnit": "BO",
            "attributes": [{ "attribute": "AGE", "value": "31" }]
        }])
        .to_string(),
    );

    let report = run_validate(&workspace.args(&["--id-scheme", "code"])).expect("run validate");
    assert_eq!(report.status, BatchStatus::Ok);

    let report = run_validate(&workspace.args(&[])).expect("run validate");
    assert_eq!(report.status, BatchStatus::Error);
}

#[test]
fn summary_tables_list_conflicts() {
    let workspace = Workspace::new();
    let report = run_validate(&workspace.args(&[])).expect("run validate");

    let summary = summary_table(&report).to_string();
    assert!(summary.contains("Imported"));

    let conflicts = conflict_table(&report).expect("conflicts").to_string();
    assert!(conflicts.contains("Vy4Jlc8yjJQ"));
    assert!(conflicts.contains("E1007"));
    assert!(!conflicts.contains("Kj6vYde4LHh"));
}

#[test]
fn missing_snapshot_is_reported_with_path() {
    let workspace = Workspace::new();
    fs::remove_file(workspace.path("snapshot.json")).expect("remove snapshot");

    let error = run_validate(&workspace.args(&[])).unwrap_err();
    assert!(format!("{error:#}").contains("read reference snapshot"));
}

#[test]
fn invalid_options_file_is_rejected() {
    let workspace = Workspace::new();
    let config = path_arg(&workspace.write("options.toml", "threads = 0\n"));

    let error = run_validate(&workspace.args(&["--config", &config])).unwrap_err();
    assert!(format!("{error:#}").contains("threads must be at least 1"));
}

#[test]
fn binary_exit_code_reflects_batch_status() {
    let workspace = Workspace::new();
    let output = Process::new(env!("CARGO_BIN_EXE_tracker-import"))
        .arg("--color")
        .arg("never")
        .arg("validate")
        .arg(workspace.path("records.json"))
        .arg("--snapshot")
        .arg(workspace.path("snapshot.json"))
        .output()
        .expect("run tracker-import");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Batch: WARNING (3 records"));
}

#[test]
fn codes_command_lists_every_code() {
    let output = Process::new(env!("CARGO_BIN_EXE_tracker-import"))
        .arg("codes")
        .output()
        .expect("run tracker-import");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("E1004"));
    assert!(stdout.contains("E1064"));
}
