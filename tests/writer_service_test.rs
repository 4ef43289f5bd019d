//! Tests for WriterService

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use redoscript::application::WriterService;
use redoscript::context::ScriptContext;
use redoscript::infrastructure::formats::FormatRegistry;
use redoscript::ApplicationError;

fn writer() -> WriterService {
    WriterService::new(Arc::new(FormatRegistry::with_defaults()))
}

#[test]
fn given_json_target_when_writing_then_file_parses_back() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.json");
    let value = json!({"b": 1, "a": [true, null]});

    writer().write(&value, &dest).unwrap();

    let written = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&written).unwrap(), value);
    // Key order survives the round trip.
    assert!(written.find("\"b\"").unwrap() < written.find("\"a\"").unwrap());
}

#[test]
fn given_yaml_target_when_writing_then_file_parses_back() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.yaml");
    let value = json!({"name": "test", "items": [1, 2]});

    writer().write(&value, &dest).unwrap();

    let written = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(
        serde_yaml::from_str::<serde_json::Value>(&written).unwrap(),
        value
    );
}

#[test]
fn given_record_array_when_writing_csv_then_header_keeps_key_order() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.csv");
    let value = json!([
        {"zeta": "1", "alpha": 2},
        {"zeta": "3", "alpha": null}
    ]);

    writer().write(&value, &dest).unwrap();

    let written = std::fs::read_to_string(&dest).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines, ["zeta,alpha", "1,2", "3,"]);
}

#[test]
fn given_line_array_when_writing_txt_then_one_line_per_element() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.txt");

    writer().write(&json!(["one", "two"]), &dest).unwrap();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "one\ntwo\n");
}

#[test]
fn given_non_string_lines_when_writing_txt_then_write_fails() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.txt");

    let err = writer().write(&json!([1, 2]), &dest).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_unknown_extension_when_writing_then_unsupported_format() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.xlsx");

    let err = writer().write(&json!({}), &dest).unwrap_err();

    match err {
        ApplicationError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "xlsx"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn given_redo_context_when_outputting_then_temp_gets_targets_format() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("report.json");
    let temp_slot = temp.path().join("report.json.redo-tmp");
    let args = vec![
        "do".to_string(),
        target.display().to_string(),
        "report".to_string(),
        temp_slot.display().to_string(),
    ];
    let ctx = ScriptContext::from_args(&args, false).unwrap();
    let value = json!({"rows": 3});

    writer().output(&value, &ctx).unwrap();

    // Data lands in the temp slot, not the target; redo does the rename.
    assert!(!target.exists());
    let written = std::fs::read_to_string(&temp_slot).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&written).unwrap(), value);
}

#[test]
fn given_toml_target_when_writing_then_file_parses_back() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.toml");
    let value = json!({"package": {"name": "demo", "version": "0.1.0"}});

    writer().write(&value, &dest).unwrap();

    let written = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(toml::from_str::<serde_json::Value>(&written).unwrap(), value);
}
