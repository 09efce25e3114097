//! Shared helpers for okra CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{Duration, Utc};

/// Build an `okra` command with a hermetic environment: colors off, no user
/// config picked up.
pub fn okra_cmd() -> Command {
    let mut cmd = Command::cargo_bin("okra").expect("okra binary");
    cmd.env("NO_COLOR", "1");
    cmd.env("OKRA_CONFIG", "/nonexistent/okra-config.yaml");
    cmd
}

/// Write a small knowledge fixture for organization `org-1` covering all four
/// retrieved collections, every item categorized "operational".
pub fn write_knowledge_fixture(dir: &Path) -> PathBuf {
    let now = Utc::now();
    let recent = (now - Duration::days(2)).to_rfc3339();
    let older = (now - Duration::days(20)).to_rfc3339();

    let lines = vec![
        format!(
            r#"{{"collection":"insight","id":"ins-1","organizationId":"org-1","title":"Churn driver","description":"Churn is rising because of enterprise pricing.","category":"operational","confidence":0.9,"createdAt":"{recent}","updatedAt":"{recent}"}}"#
        ),
        format!(
            r#"{{"collection":"insight","id":"ins-2","organizationId":"org-1","title":"Support backlog","description":"Support ticket backlog doubled after the release.","category":"operational","createdAt":"{older}","updatedAt":"{older}"}}"#
        ),
        format!(
            r#"{{"collection":"evidence","id":"ev-1","organizationId":"org-1","title":"Exit survey","content":"Churned customers cite pricing in exit surveys.","category":"operational","confidence":0.8,"createdAt":"{recent}","updatedAt":"{recent}"}}"#
        ),
        format!(
            r#"{{"collection":"kpi","id":"kpi-1","organizationId":"org-1","name":"Monthly churn","value":4.2,"unit":"%","target":3.0,"category":"operational","createdAt":"{recent}","updatedAt":"{recent}"}}"#
        ),
        format!(
            r#"{{"collection":"scenario","id":"sc-1","organizationId":"org-1","name":"Price war","description":"A competitor undercuts enterprise pricing by 20 percent.","probability":0.4,"category":"operational","createdAt":"{older}","updatedAt":"{older}"}}"#
        ),
        format!(
            r#"{{"collection":"recommendation","id":"rec-1","organizationId":"org-1","title":"Tier review","description":"Review the enterprise pricing tiers.","category":"operational","createdAt":"{older}","updatedAt":"{older}"}}"#
        ),
    ];

    let path = dir.join("knowledge.jsonl");
    fs::write(&path, lines.join("\n")).expect("write knowledge fixture");
    path
}
