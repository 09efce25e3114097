//! Integration tests for `okra collections`.

mod common;

use common::{okra_cmd, write_knowledge_fixture};
use tempfile::TempDir;

#[test]
fn collections_human_output_lists_counts() {
    let temp = TempDir::new().expect("create temp dir");
    let data = write_knowledge_fixture(temp.path());

    okra_cmd()
        .arg("collections")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicates::str::contains("insight"))
        .stdout(predicates::str::contains("total"));
}

#[test]
fn collections_json_counts_match_fixture() {
    let temp = TempDir::new().expect("create temp dir");
    let data = write_knowledge_fixture(temp.path());

    let output = okra_cmd()
        .arg("collections")
        .arg("--data")
        .arg(&data)
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(report["total"], 6);
    assert_eq!(report["collections"]["insight"], 2);
    assert_eq!(report["collections"]["evidence"], 1);
    assert_eq!(report["collections"]["kpi"], 1);
    assert_eq!(report["collections"]["scenario"], 1);
    assert_eq!(report["collections"]["recommendation"], 1);
}

#[test]
fn collections_missing_file_fails() {
    okra_cmd()
        .arg("collections")
        .arg("--data")
        .arg("/nonexistent/knowledge.jsonl")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to load knowledge file"));
}
