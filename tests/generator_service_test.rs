//! Tests for GeneratorService

use std::io;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use umlgen::application::services::{ArtifactPaths, GeneratorService};
use umlgen::application::ApplicationError;
use umlgen::domain::DomainError;
use umlgen::infrastructure::traits::{FileSystem, RealFileSystem};
use umlgen::util::testing::{init_test_setup, write_model, CAR_MODEL_XML};

fn service() -> GeneratorService {
    init_test_setup();
    GeneratorService::new(Arc::new(RealFileSystem))
}

/// Reads from the real filesystem, refuses every write.
struct ReadOnlyFileSystem;

impl FileSystem for ReadOnlyFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn given_valid_model_when_generating_then_writes_both_artifacts() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(temp.path(), "model.xml", CAR_MODEL_XML);
    let paths = ArtifactPaths::in_dir(&temp.path().join("out"), "config.xml", "meta.json");

    // Act
    let report = service().generate(&input, &paths).unwrap();

    // Assert
    assert_eq!(report.hierarchy_classes, 3);
    assert_eq!(report.descriptors, 3);

    let xml = std::fs::read_to_string(&paths.hierarchy).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<Engine>"));

    let json = std::fs::read_to_string(&paths.metadata).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[test]
fn given_model_without_root_when_generating_then_metadata_still_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(
        temp.path(),
        "model.xml",
        r#"<Model><Class name="A"/><Class name="B"/></Model>"#,
    );
    let paths = ArtifactPaths::in_dir(temp.path(), "config.xml", "meta.json");

    // Act
    let result = service().generate(&input, &paths);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NoRootClass))
    ));
    assert!(!paths.hierarchy.exists());
    assert!(paths.metadata.exists());
}

#[test]
fn given_missing_input_when_loading_then_input_not_found() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("absent.xml");

    // Act
    let result = service().load(&input);

    // Assert
    assert!(matches!(result, Err(ApplicationError::InputNotFound(p)) if p == input));
}

#[test]
fn given_latin1_model_when_loading_then_declared_encoding_is_honoured() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("model.xml");
    let mut bytes =
        br#"<?xml version="1.0" encoding="ISO-8859-1"?><Model><Class name="Car" isRoot="true" documentation="Gr"#
            .to_vec();
    bytes.push(0xFC);
    bytes.extend_from_slice(br#"n"/></Model>"#);
    std::fs::write(&input, bytes).unwrap();

    // Act
    let model = service().load(&input).unwrap();

    // Assert
    assert_eq!(model.class("Car").unwrap().documentation, "Gr\u{fc}n");
}

#[test]
fn given_undecodable_model_when_loading_then_domain_error_not_io_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("model.xml");
    std::fs::write(&input, b"<Model><Class name=\"Gr\xFCn\" isRoot=\"true\"/></Model>").unwrap();

    // Act
    let result = service().load(&input);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::MalformedInput { .. }))
    ));
}

#[test]
fn given_duplicate_class_when_loading_then_domain_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(
        temp.path(),
        "model.xml",
        r#"<Model><Class name="A" isRoot="true"/><Class name="A"/></Model>"#,
    );

    // Act
    let result = service().load(&input);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DuplicateClass(name))) if name == "A"
    ));
}

#[test]
fn given_unresolved_aggregation_when_loading_then_domain_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(
        temp.path(),
        "model.xml",
        r#"<Model>
            <Class name="A" isRoot="true"/>
            <Aggregation source="Ghost" target="A" sourceMultiplicity="1" targetMultiplicity="1"/>
        </Model>"#,
    );

    // Act
    let result = service().load(&input);

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::UnresolvedReference { name, .. })) => {
            assert_eq!(name, "Ghost")
        }
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}

#[test]
fn given_unwritable_output_when_generating_then_operation_failed_with_path() {
    // Arrange
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let input = write_model(temp.path(), "model.xml", CAR_MODEL_XML);
    let paths = ArtifactPaths::in_dir(temp.path(), "config.xml", "meta.json");
    let service = GeneratorService::new(Arc::new(ReadOnlyFileSystem));

    // Act
    let result = service.generate(&input, &paths);

    // Assert
    match result {
        Err(ApplicationError::OperationFailed { context, .. }) => {
            assert!(context.contains("config.xml"), "{context}")
        }
        other => panic!("expected write failure, got {other:?}"),
    }
}

#[test]
fn given_valid_model_when_checking_then_reports_unreachable_classes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(
        temp.path(),
        "model.xml",
        r#"<Model>
            <Class name="Root" isRoot="true"/><Class name="Child"/><Class name="Loose"/>
            <Aggregation source="Child" target="Root" sourceMultiplicity="0..2" targetMultiplicity="1"/>
        </Model>"#,
    );

    // Act
    let summary = service().check(&input).unwrap();

    // Assert
    assert_eq!(summary.classes, 3);
    assert_eq!(summary.aggregations, 1);
    assert_eq!(summary.root, "Root");
    assert_eq!(summary.hierarchy_classes, 2);
    assert_eq!(summary.depth, 2);
    assert_eq!(summary.unreachable, vec!["Loose".to_string()]);
}

#[test]
fn given_custom_indent_when_rendering_then_uses_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_model(temp.path(), "model.xml", CAR_MODEL_XML);
    let service = GeneratorService::with_indent(Arc::new(RealFileSystem), 2);
    let model = service.load(&input).unwrap();

    // Act
    let xml = service.render_hierarchy(&model).unwrap();
    let json = service.render_metadata(&model).unwrap();

    // Assert
    assert!(xml.contains("\n  <brand>string</brand>"), "{xml}");
    assert!(json.contains("\n  {"), "{json}");
}
