//! Exit status and diagnostics of the binary, without touching the network

use std::process::{Command, Output};

fn hetzname(args: &[&str], token: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hetzname"));
    cmd.args(args)
        .env_remove("HETZNAME_API_TOKEN")
        .env_remove("HETZNAME_API_BASE")
        .env_remove("HETZNAME_TIMEOUT")
        .env_remove("RUST_LOG");
    if let Some(token) = token {
        cmd.env("HETZNAME_API_TOKEN", token);
    }
    cmd.output().expect("run hetzname")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_arguments_prints_help_and_fails() {
    let output = hetzname(&[], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--zone-name"));
}

#[test]
fn help_and_version_succeed() {
    let output = hetzname(&["-h"], None);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--record-id"));

    let output = hetzname(&["-V"], None);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_fails() {
    let output = hetzname(&["--bogus"], None);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_token_is_reported() {
    let output = hetzname(&["-z", "example.com", "-r", "dyn"], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("hetzname: no API token provided"));
}

#[test]
fn invalid_type_is_reported() {
    let output = hetzname(&["-z", "example.com", "-r", "dyn", "-T", "CNAME"], Some("tok"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'CNAME'"));
}

#[test]
fn conflicting_identifiers_are_reported() {
    let output = hetzname(&["-z", "example.com", "-Z", "abc", "-r", "dyn"], Some("tok"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not both"));
}

#[test]
fn invalid_ttl_is_reported() {
    let output = hetzname(&["-z", "example.com", "-r", "dyn", "-t", "0"], Some("tok"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("hetzname: invalid"));
}
