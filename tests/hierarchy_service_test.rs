//! Tests for HierarchyService and ServiceContainer loading

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use orgtree::application::services::HierarchyService;
use orgtree::application::ApplicationError;
use orgtree::config::Settings;
use orgtree::domain::{EntityKind, TreeBuilder};
use orgtree::infrastructure::di::ServiceContainer;
use orgtree::infrastructure::traits::RealFileSystem;
use orgtree::infrastructure::InfraError;

fn create_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write hierarchy file");
    path
}

fn service() -> HierarchyService {
    HierarchyService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_json_file_when_loading_then_records_in_document_order() {
    let temp = TempDir::new().unwrap();
    let path = create_file(
        &temp,
        "org.json",
        r#"{
  "10": { "name": "HQ", "parent": "-1", "type": "object" },
  "2": { "name": "Ann", "parent": "10", "type": "person" },
  "7": { "name": "Shop", "parent": "2", "type": "store" }
}"#,
    );

    let records = service().load(&path).unwrap();

    let keys: Vec<&str> = records.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["10", "2", "7"]);
    assert_eq!(records["10"].kind, EntityKind::Object);
    assert_eq!(records["7"].parent, "2");
}

#[test]
fn given_toml_file_when_loading_then_builds_same_tree_as_json() {
    let temp = TempDir::new().unwrap();
    let toml_path = create_file(
        &temp,
        "org.toml",
        r#"
["0"]
name = "HQ"
parent = "-1"
type = "obj"

["1"]
name = "Ann"
parent = "0"
type = "person"
"#,
    );
    let json_path = create_file(
        &temp,
        "org.json",
        r#"{"0": {"name": "HQ", "parent": "-1", "type": "obj"},
            "1": {"name": "Ann", "parent": "0", "type": "person"}}"#,
    );

    let from_toml = service().load(&toml_path).unwrap();
    let from_json = service().load(&json_path).unwrap();

    assert_eq!(from_toml, from_json);
    let tree = TreeBuilder::new().build(&from_toml);
    assert_eq!(tree.children_of("0").len(), 1);
}

#[test]
fn given_unsupported_extension_when_loading_then_errors() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "org.yaml", "0: {}");

    let result = service().load(&path);

    assert!(matches!(result, Err(ApplicationError::UnsupportedFormat(_))));
}

#[test]
fn given_missing_file_when_loading_then_errors_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::SourceNotFound(_)));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn given_directory_with_json_name_when_loading_then_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("org.json");
    std::fs::create_dir(&path).unwrap();

    let result = service().load(&path);

    assert!(matches!(result, Err(ApplicationError::SourceNotFound(_))));
}

#[test]
fn given_malformed_json_when_loading_then_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "bad.json", "{ not json");

    let result = service().load(&path);

    assert!(matches!(result, Err(ApplicationError::Parse { .. })));
}

#[test]
fn given_sample_flag_when_loading_through_container_then_uses_builtin() {
    let container = ServiceContainer::new(Settings::default());

    let records = container.load_records(None, true).unwrap();

    assert_eq!(records.len(), 10);
}

#[test]
fn given_no_source_when_loading_through_container_then_errors() {
    let container = ServiceContainer::new(Settings::default());

    let result = container.load_records(None, false);

    assert!(matches!(
        result,
        Err(InfraError::Application(ApplicationError::NoSource))
    ));
}

#[test]
fn given_configured_source_when_loading_through_container_then_reads_it() {
    let temp = TempDir::new().unwrap();
    let path = create_file(
        &temp,
        "org.json",
        r#"{"a": {"name": "A", "parent": "none", "type": "obj"}}"#,
    );
    let settings = Settings {
        source: Some(path),
        sentinel: "none".into(),
        ..Default::default()
    };
    let container = ServiceContainer::new(settings);

    let records = container.load_records(None::<&Path>, false).unwrap();
    let session = container.session(records);

    let root = session.tree().find("a").unwrap();
    assert_eq!(root.root_reason, Some(orgtree::domain::RootReason::NoParent));
    assert!(session.is_expanded("a"));
}
