//! Integration tests for the find_records binary

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const SRU_RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<zs:searchRetrieveResponse xmlns:zs="http://www.loc.gov/zing/srw/">
  <zs:numberOfRecords>1</zs:numberOfRecords>
  <zs:records><zs:record><zs:recordData><record xmlns="http://www.loc.gov/MARC21/slim"><controlfield tag="001">4242</controlfield></record></zs:recordData></zs:record></zs:records>
</zs:searchRetrieveResponse>"#;

fn find_records() -> Command {
    let mut cmd = Command::cargo_bin("find_records").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn with_services(cmd: &mut Command, server: &MockServer) {
    cmd.env("SOLR_INDEX", server.url("/solr"))
        .env("OLE_INDEX", server.url("/sru"));
}

/// Test CLI responds to --help
#[test]
fn test_cli_help() {
    find_records()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show_lookups"))
        .stdout(predicate::str::contains("searching"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    find_records()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("find_records"));
}

/// Field code and field label cannot be combined
#[test]
fn test_field_code_and_label_rejected() {
    find_records()
        .env_remove("OLE_INDEX")
        .env_remove("SOLR_INDEX")
        .args(["searching", "-f", "245", "-fl", "Title Statement", "hamlet"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

/// A subfield label cannot follow a field code
#[test]
fn test_subfield_label_with_field_code_rejected() {
    find_records()
        .args(["searching", "-f", "245", "-sfl", "Title", "hamlet"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--subfield_label_lookup"));
}

#[test]
fn test_show_lookups_output() {
    find_records()
        .env("OLE_INDEX", "http://ole.example.edu/sru")
        .env("SOLR_INDEX", "http://solr.example.edu/solr")
        .arg("show_lookups")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not())
        .stdout(predicate::str::contains("245  Title Statement"));
}

#[test]
fn test_missing_environment_fails() {
    find_records()
        .env_remove("OLE_INDEX")
        .env("SOLR_INDEX", "http://solr.example.edu/solr")
        .arg("show_lookups")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OLE_INDEX"));
}

#[test]
fn test_search_without_matches() {
    let server = MockServer::start();
    let solr = server.mock(|when, then| {
        when.method(GET)
            .path("/solr/ole/select")
            .query_param("q", "mdf_245a:(qwxzv)");
        then.status(200)
            .json_body(serde_json::json!({"response": {"numFound": 0, "start": 0, "docs": []}}));
    });

    let mut cmd = find_records();
    with_services(&mut cmd, &server);
    cmd.args(["searching", "-f", "245", "-sf", "a", "qwxzv"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Total records in search: 0"));

    solr.assert();
}

#[test]
fn test_extract_records_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/solr/ole/select");
        then.status(200).json_body(serde_json::json!({
            "response": {"numFound": 1, "start": 0, "docs": [{"controlfield_001": ["4242"]}]}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/sru").query_param("query", "id=\"4242\"");
        then.status(200).body(SRU_RECORD);
    });

    let mut cmd = find_records();
    with_services(&mut cmd, &server);
    cmd.current_dir(temp_dir.path())
        .args(["searching", "--extract_records", "hamlet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("record for MARC bib number 4242 written to"));

    let files: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let content = std::fs::read_to_string(&files[0]).unwrap();
    assert!(content.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(roxmltree::Document::parse(&content).is_ok());
}

#[test]
fn test_search_service_failure_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/solr/ole/select");
        then.status(500);
    });

    let mut cmd = find_records();
    with_services(&mut cmd, &server);
    cmd.args(["searching", "hamlet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HTTP 500"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_131() {
    use std::process::Stdio;
    use std::time::Duration;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/solr/ole/select");
        then.status(200)
            .delay(Duration::from_secs(30))
            .json_body(serde_json::json!({"response": {"numFound": 0, "docs": []}}));
    });

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("find_records"))
        .env("SOLR_INDEX", server.url("/solr"))
        .env("OLE_INDEX", server.url("/sru"))
        .args(["searching", "hamlet"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(1500));
    let kill = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(kill.success());

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(131));
}
