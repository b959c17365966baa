//! Export Integration Tests
//!
//! Runs the whole pipeline against a small project on disk and inspects the
//! produced package.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gmpack::adapters::PayloadCopier;
use gmpack::core::{ExportError, ExportOptions, ExportRequest, Exporter, SelectionPattern};
use gmpack::domain::{PackageFields, ResourceIdentity};
use serde_json::{json, Value};
use tempfile::TempDir;

const PROJECT_FILE: &str = r#"{
  "$GMProject": "",
  "%Name": "Game",
  "Folders": [
    {"$GMFolder":"","%Name":"Rooms","folderPath":"folders/Rooms.yy","name":"Rooms",},
    {"$GMFolder":"","%Name":"Scripts","folderPath":"folders/Scripts.yy","name":"Scripts",},
    {"$GMFolder":"","%Name":"Sub","folderPath":"folders/Scripts/Sub.yy","name":"Sub",},
  ],
  "MetaData": {"IDEVersion":"2024.2.0.163",},
  "name": "Game",
  "Options": [
    {"name":"Main","path":"options/main/options_main.yy",},
  ],
  "resources": [
    {"id":{"name":"foo","path":"scripts/foo/foo.yy",},},
    {"id":{"name":"rm_start","path":"rooms/rm_start/rm_start.yy",},},
  ],
  "resourceType": "GMProject",
  "RoomOrderNodes": [
    {"roomId":{"name":"rm_start","path":"rooms/rm_start/rm_start.yy",},},
  ],
}"#;

struct Fixture {
    project: TempDir,
    staging: TempDir,
    output: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let project = TempDir::new().unwrap();
        let root = project.path();

        write(root, "Game.yyp", PROJECT_FILE);
        write(
            root,
            "scripts/foo/foo.yy",
            r#"{"name":"foo","parent":{"name":"Sub","path":"folders/Scripts/Sub.yy",},}"#,
        );
        write(root, "scripts/foo/foo.gml", "function foo() {}");
        write(
            root,
            "rooms/rm_start/rm_start.yy",
            r#"{"name":"rm_start","parent":{"name":"Rooms","path":"folders/Rooms.yy",},}"#,
        );
        write(root, "options/main/options_main.yy", "{}");

        Self {
            project,
            staging: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
        }
    }

    fn request(&self, pattern: &str) -> ExportRequest {
        ExportRequest {
            project_path: self.project.path().to_path_buf(),
            output_file: self.output.path().join("pkg.yymps"),
            pattern: SelectionPattern::parse(pattern).unwrap(),
            fields: PackageFields {
                display_name: "Pkg".to_string(),
                id: "com.example.pkg".to_string(),
                publisher: "Example".to_string(),
                version: "1.0.0".to_string(),
            },
            dry_run: false,
        }
    }

    fn exporter(&self) -> Exporter {
        Exporter::new(ExportOptions {
            staging_dir: self.staging.path().to_path_buf(),
            fail_on_copy_error: false,
        })
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| !n.ends_with('/'))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

fn archive_json(path: &Path, name: &str) -> Value {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_export_everything() {
    let fixture = Fixture::new();
    let request = fixture.request("*");

    let report = fixture.exporter().export(&request).await.unwrap();
    let output = report.output.clone().unwrap();

    assert_eq!(output, request.output_file);
    assert_eq!(report.resources.len(), 2);
    assert_eq!(
        report.folders,
        vec!["folders/Rooms.yy", "folders/Scripts.yy", "folders/Scripts/Sub.yy"]
    );
    assert!(report.copy_failures.is_empty());

    assert_eq!(
        archive_names(&output),
        vec![
            "Game.yyp",
            "metadata.json",
            "rooms/rm_start/rm_start.yy",
            "scripts/foo/foo.gml",
            "scripts/foo/foo.yy",
        ]
    );

    let summary = archive_json(&output, "metadata.json");
    assert_eq!(
        summary,
        json!({
            "package_id": "com.example.pkg",
            "display_name": "Pkg",
            "version": "1.0.0",
            "package_type": "asset",
            "ide_version": "2024.2.0.163"
        })
    );

    let description = archive_json(&output, "Game.yyp");
    assert_eq!(description["Options"], json!([]));
    assert_eq!(description["MetaData"]["PackageType"], json!("Asset"));
    assert_eq!(description["MetaData"]["PackagePublisher"], json!("Example"));
    assert_eq!(description["RoomOrderNodes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_export_subset() {
    let fixture = Fixture::new();
    let request = fixture.request("Scripts");

    let report = fixture.exporter().export(&request).await.unwrap();
    let output = report.output.unwrap();

    assert_eq!(
        report.resources,
        vec![ResourceIdentity::new("foo", "scripts/foo/foo.yy")]
    );
    assert_eq!(
        archive_names(&output),
        vec!["Game.yyp", "metadata.json", "scripts/foo/foo.gml", "scripts/foo/foo.yy"]
    );

    let description = archive_json(&output, "Game.yyp");
    assert_eq!(description["resources"].as_array().unwrap().len(), 1);
    assert_eq!(description["Folders"].as_array().unwrap().len(), 2);
    assert_eq!(description["RoomOrderNodes"], json!([]));
}

#[tokio::test]
async fn test_staging_directory_is_removed() {
    let fixture = Fixture::new();
    fixture
        .exporter()
        .export(&fixture.request("*"))
        .await
        .unwrap();

    assert_eq!(fs::read_dir(fixture.staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let fixture = Fixture::new();
    let mut request = fixture.request("Rooms");
    request.dry_run = true;

    let report = fixture.exporter().export(&request).await.unwrap();

    assert!(report.output.is_none());
    assert_eq!(report.folders, vec!["folders/Rooms.yy"]);
    assert!(!request.output_file.exists());
    assert_eq!(fs::read_dir(fixture.staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_empty_match_fails() {
    let fixture = Fixture::new();
    let request = fixture.request("folders/NoSuchFolder");

    let err = fixture.exporter().export(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::MissingSelection { .. })
    ));
    assert!(!request.output_file.exists());
}

#[tokio::test]
async fn test_missing_project_fails() {
    let fixture = Fixture::new();
    let mut request = fixture.request("*");
    request.project_path = fixture.project.path().join("missing");

    let err = fixture.exporter().export(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::ProjectNotFound(_))
    ));
}

#[tokio::test]
async fn test_copy_failure_is_reported_not_fatal() {
    let fixture = Fixture::new();
    let failing = FailingCopier {
        fail: "rm_start".to_string(),
    };
    let report = fixture
        .exporter()
        .with_copier(failing)
        .export(&fixture.request("*"))
        .await
        .unwrap();

    assert_eq!(report.copy_failures.len(), 1);
    assert_eq!(report.copy_failures[0].resource.name, "rm_start");
    assert!(report.output.unwrap().exists());
}

#[tokio::test]
async fn test_copy_failure_aborts_when_requested() {
    let fixture = Fixture::new();
    let exporter = Exporter::new(ExportOptions {
        staging_dir: fixture.staging.path().to_path_buf(),
        fail_on_copy_error: true,
    })
    .with_copier(FailingCopier {
        fail: "foo".to_string(),
    });

    let request = fixture.request("*");
    let err = exporter.export(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::PayloadCopy { failed: 1 })
    ));
    assert!(!request.output_file.exists());
}

#[tokio::test]
async fn test_payloads_copied_in_selection_order() {
    let fixture = Fixture::new();
    let copied = Arc::new(Mutex::new(Vec::new()));

    let report = fixture
        .exporter()
        .with_copier(RecordingCopier {
            copied: Arc::clone(&copied),
        })
        .export(&fixture.request("*"))
        .await
        .unwrap();

    assert_eq!(*copied.lock().unwrap(), report.resources);
}

/// Copier that fails for one resource name and copies nothing
struct FailingCopier {
    fail: String,
}

#[async_trait]
impl PayloadCopier for FailingCopier {
    async fn copy(
        &self,
        resource: &ResourceIdentity,
        _source_root: &Path,
        _staging_root: &Path,
    ) -> Result<usize, ExportError> {
        if resource.name == self.fail {
            return Err(ExportError::Io {
                path: resource.path.clone().into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            });
        }
        Ok(0)
    }
}

/// Copier that records the order it was called in
struct RecordingCopier {
    copied: Arc<Mutex<Vec<ResourceIdentity>>>,
}

#[async_trait]
impl PayloadCopier for RecordingCopier {
    async fn copy(
        &self,
        resource: &ResourceIdentity,
        _source_root: &Path,
        _staging_root: &Path,
    ) -> Result<usize, ExportError> {
        self.copied.lock().unwrap().push(resource.clone());
        Ok(0)
    }
}
