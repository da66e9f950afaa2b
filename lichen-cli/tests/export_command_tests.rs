//! Integration tests for `lichen export` and `lichen inspect`.
//!
//! Each test writes an arena-form model to a temp dir and runs the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use lichen_evaluated_model::{
    EvaluatedIssue, EvaluatedModel, EvaluatedPackage, EvaluatedPackagePath, NodeRef, ScopeName,
    Severity,
};
use serde_json::Value;
use tempfile::TempDir;

fn lichen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lichen"));
    cmd.env_remove("RUST_LOG")
        .env_remove("LICHEN_EXPORT_FORMAT")
        .env_remove("LICHEN_EXPORT_TRAVERSAL_ORDER")
        .env_remove("LICHEN_EXPORT_ALWAYS_REFERENCE")
        .env_remove("LICHEN_EXPORT_TAG_REFERENCES")
        .env_remove("LICHEN_EXPORT_MAX_IDENTITIES_PER_TYPE")
        .env("NO_COLOR", "1");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    lichen()
        .arg("--config")
        .arg(dir.join("lichen.toml"))
        .args(args)
        .output()
        .expect("should run lichen")
}

/// Project `app` depending on `lib`, with one issue on `lib`.
fn sample_model() -> EvaluatedModel {
    let mut model = EvaluatedModel::default();
    let compile = model.add(ScopeName {
        name: "compile".to_owned(),
    });
    let app = model.add(EvaluatedPackage::project("Cargo::app:1.0.0"));
    let lib = model.add(EvaluatedPackage::new("Cargo::lib:0.3.0"));
    let path = model.add(EvaluatedPackagePath {
        pkg: lib,
        project: app,
        scope: compile,
        path: Vec::new(),
    });
    let mut issue = EvaluatedIssue::new("license not detected", Severity::Warning);
    issue.package = Some(lib);
    issue.path = Some(path);
    let issue = model.add(issue);
    if let Some(p) = model.get_mut(lib) {
        p.paths.push(path);
        p.issues.push(issue);
    }
    model.refresh_statistics();
    model
}

fn write_model(dir: &Path, model: &EvaluatedModel) -> PathBuf {
    let path = dir.join("model.json");
    fs::write(&path, serde_json::to_string(model).expect("model serializes"))
        .expect("should write model");
    path
}

#[test]
fn test_export_to_stdout_is_index_aligned() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &sample_model());

    let output = run(temp_dir.path(), &["export", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let doc: Value = serde_json::from_slice(&output.stdout).expect("stdout is the JSON document");
    let packages = doc["packages"].as_array().expect("packages array");
    assert_eq!(packages.len(), 2);
    for (position, entry) in packages.iter().enumerate() {
        assert_eq!(entry["_id"].as_u64(), Some(position as u64));
    }
    // issues are visited before packages and issue.package is reference-only,
    // so `lib` takes identity 0 and is embedded in the packages container
    assert_eq!(doc["issues"][0]["package"], serde_json::json!({"_id": 0}));
    assert_eq!(packages[0]["id"], "Cargo::lib:0.3.0");
}

#[test]
fn test_export_yaml_to_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &sample_model());
    let out = temp_dir.path().join("evaluated-model.yml");

    let output = run(
        temp_dir.path(),
        &[
            "--output",
            "json",
            "export",
            input.to_str().expect("utf-8 path"),
            "--format",
            "yaml",
            "-o",
            out.to_str().expect("utf-8 path"),
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report on stdout");
    assert_eq!(report["format"], "yaml");
    assert_eq!(report["total_nodes"], 5);

    let yaml = fs::read_to_string(&out).expect("output file exists");
    let doc: Value = serde_yaml::from_str(&yaml).expect("valid YAML");
    assert_eq!(doc["scopes"][0]["name"], "compile");
    assert!(
        !temp_dir.path().join("evaluated-model.yml.partial").exists(),
        "staging file should be moved into place"
    );
}

#[test]
fn test_export_respects_config_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    fs::write(
        temp_dir.path().join("lichen.toml"),
        "[export]\ntag_references = true\n",
    )
    .expect("should write config");
    let input = write_model(temp_dir.path(), &sample_model());

    let output = run(temp_dir.path(), &["export", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let doc: Value = serde_json::from_slice(&output.stdout).expect("JSON document");
    assert_eq!(
        doc["issues"][0]["package"],
        serde_json::json!({"type": "package", "_id": 0})
    );
}

#[test]
fn test_export_dangling_reference_writes_nothing() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut model = sample_model();
    model.issues[0].package = Some(NodeRef::new(42));
    let input = write_model(temp_dir.path(), &model);
    let out = temp_dir.path().join("out.json");

    let output = run(
        temp_dir.path(),
        &[
            "export",
            input.to_str().expect("utf-8 path"),
            "-o",
            out.to_str().expect("utf-8 path"),
        ],
    );

    assert_eq!(output.status.code(), Some(5), "export failure should exit 5");
    assert!(!out.exists(), "no partial output on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("issues[0].package"),
        "error should carry the field path: {stderr}"
    );
}

#[test]
fn test_export_identity_exhaustion_exits_5() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &sample_model());

    let output = run(
        temp_dir.path(),
        &[
            "export",
            input.to_str().expect("utf-8 path"),
            "--max-identities",
            "1",
        ],
    );

    assert_eq!(output.status.code(), Some(5));
    assert!(output.stdout.is_empty(), "no document on failure");
}

#[test]
fn test_export_zero_identity_limit_is_config_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &EvaluatedModel::default());

    let output = run(
        temp_dir.path(),
        &[
            "export",
            input.to_str().expect("utf-8 path"),
            "--max-identities",
            "0",
        ],
    );

    assert_eq!(output.status.code(), Some(2), "zero limit should exit 2");
    assert!(output.stdout.is_empty(), "no document on config error");
}

#[test]
fn test_export_unknown_container_is_config_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &sample_model());

    let output = run(
        temp_dir.path(),
        &[
            "export",
            input.to_str().expect("utf-8 path"),
            "--order",
            "widgets",
        ],
    );

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_export_invalid_model_exits_4() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = temp_dir.path().join("model.json");
    fs::write(&input, "not json").expect("should write input");

    let output = run(temp_dir.path(), &["export", input.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_inspect_reports_counts() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = write_model(temp_dir.path(), &sample_model());

    let output = run(
        temp_dir.path(),
        &["--output", "json", "inspect", input.to_str().expect("utf-8 path")],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["total_nodes"], 5);
    assert_eq!(report["exportable"], true);
    assert_eq!(report["statistics_current"], true);
    assert_eq!(report["statistics"]["open_issues"]["warnings"], 1);
}
