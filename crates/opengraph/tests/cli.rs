// ABOUTME: Integration tests for the og-fetch CLI binary.
// ABOUTME: Covers argument handling and the validation failures that need no network access.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::process::Command;

fn og_fetch_cmd() -> Command {
    Command::cargo_bin("og-fetch").unwrap()
}

#[test]
fn no_args_fails() {
    og_fetch_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URLS>"));
}

#[test]
fn http_url_is_rejected() {
    og_fetch_cmd()
        .arg("http://example.com")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid scheme"))
        .stderr(predicate::str::contains("Only HTTPS URLs are allowed"));
}

#[test]
fn non_default_port_is_rejected() {
    og_fetch_cmd()
        .arg("https://example.com:8443")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port"));
}

#[test]
fn ip_host_is_rejected() {
    og_fetch_cmd()
        .arg("https://203.0.113.0/test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Using an IP as host is not allowed"));
}

#[test]
fn multiple_urls_print_envelopes() {
    let output = og_fetch_cmd()
        .arg("--compact")
        .arg("http://example.com")
        .arg("not a url")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let entries = parsed.as_array().expect("expected a JSON array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["url"], "http://example.com");
    assert_eq!(entries[0]["ok"], false);
    assert!(entries[0]["error"]
        .as_str()
        .unwrap()
        .contains("invalid scheme"));
    assert!(entries[1]["error"].as_str().unwrap().contains("invalid URI"));
}
