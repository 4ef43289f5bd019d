//! Tests for ReaderService

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::indexmap;
use serde_json::json;
use tempfile::TempDir;

use redoscript::application::ReaderService;
use redoscript::domain::{Request, Tree};
use redoscript::infrastructure::formats::FormatRegistry;
use redoscript::infrastructure::traits::RecordingRunner;
use redoscript::ApplicationError;

/// Helper to create a data file in the temp dir and return its path string.
fn create_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write data file");
    path.to_string_lossy().into_owned()
}

fn reader(runner: Arc<RecordingRunner>, declare: bool) -> ReaderService {
    ReaderService::new(runner, Arc::new(FormatRegistry::with_defaults()), declare)
}

#[test]
fn given_nested_request_when_reading_then_one_batched_call_in_flattening_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let a = create_file(&temp, "a.json", r#"{"k": 1}"#);
    let b = create_file(&temp, "b.txt", "one\ntwo\n");
    let request = Request::from(vec![
        Tree::Mapping(indexmap! { "x".to_string() => Request::from(a.as_str()) }),
        Request::from(b.as_str()),
    ]);
    let runner = Arc::new(RecordingRunner::new());

    // Act
    let result = reader(runner.clone(), true).read(&request).unwrap();

    // Assert - exactly one batch, files in flattening order
    assert_eq!(runner.calls(), vec![vec![a, b]]);
    assert_eq!(
        result,
        Tree::Sequence(vec![
            Tree::Mapping(indexmap! { "x".to_string() => Tree::Leaf(Some(json!({"k": 1}))) }),
            Tree::Leaf(Some(json!(["one", "two"]))),
        ])
    );
}

#[test]
fn given_ignore_mode_when_reading_then_still_declares_but_loads_nothing() {
    // Files deliberately absent: ignore mode must not touch the filesystem.
    let request = Request::from(vec![
        Request::from("missing.csv"),
        Tree::Mapping(indexmap! { "y".to_string() => Request::from("missing.json") }),
    ]);
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner.clone(), true).read_ignored(&request).unwrap();

    assert_eq!(runner.calls().len(), 1);
    assert_eq!(
        result,
        Tree::Sequence(vec![
            Tree::Leaf(None),
            Tree::Mapping(indexmap! { "y".to_string() => Tree::Leaf(None) }),
        ])
    );
}

#[test]
fn given_declaration_disabled_when_reading_then_builder_is_never_invoked() {
    let temp = TempDir::new().unwrap();
    let a = create_file(&temp, "a.json", "42");
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner.clone(), false)
        .read(&Request::from(a.as_str()))
        .unwrap();

    assert!(runner.calls().is_empty());
    assert_eq!(result, Tree::Leaf(Some(json!(42))));
}

#[test]
fn given_extensionless_leaf_when_reading_then_value_is_absent() {
    // No extension means freshness-only dependency, never a read.
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner, false)
        .read(&Request::from("Makefile"))
        .unwrap();

    assert_eq!(result, Tree::Leaf(None));
}

#[test]
fn given_unknown_extension_when_reading_then_unsupported_format() {
    let runner = Arc::new(RecordingRunner::new());

    let err = reader(runner, false)
        .read(&Request::from("sheet.xls"))
        .unwrap_err();

    match err {
        ApplicationError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "xls"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn given_csv_file_when_reading_then_records_keep_column_order() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "data.csv", "zeta,alpha\n1,2\n3,4\n");
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner, false)
        .read(&Request::from(path.as_str()))
        .unwrap();

    let Tree::Leaf(Some(serde_json::Value::Array(rows))) = result else {
        panic!("expected loaded array");
    };
    assert_eq!(rows.len(), 2);
    let first = rows[0].as_object().unwrap();
    let columns: Vec<&String> = first.keys().collect();
    assert_eq!(columns, ["zeta", "alpha"]);
    assert_eq!(first["zeta"], json!("1"));
}

#[test]
fn given_yaml_file_when_reading_then_value_matches_json_model() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "config.yaml", "name: test\nitems:\n  - 1\n  - 2\n");
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner, false)
        .read(&Request::from(path.as_str()))
        .unwrap();

    assert_eq!(
        result,
        Tree::Leaf(Some(json!({"name": "test", "items": [1, 2]})))
    );
}

#[test]
fn given_missing_file_when_reading_then_operation_failed_names_the_file() {
    let missing = PathBuf::from("definitely/not/here.json");
    let runner = Arc::new(RecordingRunner::new());

    let err = reader(runner, false)
        .read(&Request::from(missing))
        .unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.contains("here.json"), "context was {context:?}");
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[test]
fn given_empty_request_when_reading_then_builder_is_skipped() {
    let runner = Arc::new(RecordingRunner::new());

    let result = reader(runner.clone(), true)
        .read(&Request::from(Vec::new()))
        .unwrap();

    // Nothing to declare, nothing to load.
    assert!(runner.calls().is_empty());
    assert_eq!(result, Tree::Sequence(Vec::new()));
}
