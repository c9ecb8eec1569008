use assert_cmd::Command;
use curatorapp::catalog::CatalogDocument;
use curatorapp::store::fs::FileStore;
use curatorapp::store::ItemStore;
use curatorapp::test_utils;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn curator_cmd(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("curator").unwrap();
    cmd.env_remove("CURATOR_DATA")
        .env_remove("CURATOR_LOG")
        .arg("--data")
        .arg(data);
    cmd
}

/// A data directory with the sample catalog and, optionally, one valid sample.
fn setup_data_dir(with_sample: bool) -> TempDir {
    let temp = TempDir::new().unwrap();
    let catalog = test_utils::sample_catalog();
    let document = CatalogDocument::from(catalog.clone());
    fs::write(
        temp.path().join("catalog.json"),
        serde_json::to_string_pretty(&document).unwrap(),
    )
    .unwrap();

    if with_sample {
        let mut store = FileStore::new(temp.path().to_path_buf());
        store
            .save_item(&test_utils::sample_item(&catalog, "S-1"))
            .unwrap();
    }
    temp
}

#[test]
fn test_new_then_items() {
    let temp = setup_data_dir(false);

    curator_cmd(temp.path())
        .args(["new", "sample", "S-042"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sample S-042"));

    curator_cmd(temp.path())
        .arg("items")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. S-042"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp = setup_data_dir(false);
    curator_cmd(temp.path())
        .args(["items", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items yet."))
        .stderr(predicate::str::contains("initialized curator"));
}

#[test]
fn test_items_empty() {
    let temp = setup_data_dir(false);
    curator_cmd(temp.path())
        .arg("items")
        .assert()
        .success()
        .stdout(predicate::str::contains("No items yet."));
}

#[test]
fn test_new_kind_without_shape_fails() {
    let temp = setup_data_dir(false);
    curator_cmd(temp.path())
        .args(["new", "image", "IMG-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no shape for image items"));
}

#[test]
fn test_validate_reports_offending_fields() {
    let temp = setup_data_dir(false);
    curator_cmd(temp.path())
        .args(["new", "sample", "blank"])
        .assert()
        .success();

    curator_cmd(temp.path())
        .args(["validate", "blank"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("tissue: a value is required"))
        .stderr(predicate::str::contains("blank is invalid"));
}

#[test]
fn test_validate_valid_item() {
    let temp = setup_data_dir(true);
    curator_cmd(temp.path())
        .args(["validate", "S-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S-1 is valid"));
}

#[test]
fn test_set_nested_leaf_and_show() {
    let temp = setup_data_dir(true);

    curator_cmd(temp.path())
        .args(["set", "S-1", "specimen/site", "liver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved S-1"));

    curator_cmd(temp.path())
        .args(["show", "1", "--path", "specimen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site: liver"));

    curator_cmd(temp.path())
        .args(["show", "S-1", "--path", "specimen", "--mode", "original"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site: lung"));
}

#[test]
fn test_set_out_of_range_is_not_saved() {
    let temp = setup_data_dir(true);

    curator_cmd(temp.path())
        .args(["set", "S-1", "passage", "42"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("passage: must be at most 10"))
        .stderr(predicate::str::contains("S-1 was not saved"));

    curator_cmd(temp.path())
        .args(["show", "S-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passage: 3"));
}

#[test]
fn test_set_read_only_leaf_is_rejected() {
    let temp = setup_data_dir(true);
    curator_cmd(temp.path())
        .args(["set", "S-1", "batch", "B-8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not allowed"));
}

#[test]
fn test_set_unparseable_value() {
    let temp = setup_data_dir(true);
    curator_cmd(temp.path())
        .args(["set", "S-1", "passage", "three"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_show_json_carries_breadcrumbs() {
    let temp = setup_data_dir(true);
    let output = curator_cmd(temp.path())
        .args(["show", "S-1", "--path", "specimen", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["mode"], "current");
    assert_eq!(view["breadcrumbs"].as_array().unwrap().len(), 1);
    assert_eq!(view["pendingLookups"], false);
}

#[test]
fn test_show_unknown_path_fails() {
    let temp = setup_data_dir(true);
    curator_cmd(temp.path())
        .args(["show", "S-1", "--path", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));
}

#[test]
fn test_unknown_item_fails() {
    let temp = setup_data_dir(false);
    curator_cmd(temp.path())
        .args(["show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_missing_catalog_fails() {
    let temp = TempDir::new().unwrap();
    curator_cmd(temp.path())
        .arg("items")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open the data directory"));
}
