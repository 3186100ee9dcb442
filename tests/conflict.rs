mod common;

use std::collections::BTreeSet;
use std::io::Cursor;

use common::RecordingRunner;
use localkit::conflict::{check, confirm, scan};
use localkit::error::LaunchError;

const LISTING: &str = "\
tcp        0      0 0.0.0.0:8000            0.0.0.0:*               LISTEN
tcp        0      0 0.0.0.0:8003            0.0.0.0:*               LISTEN
tcp        0      0 0.0.0.0:22              0.0.0.0:*               LISTEN
";

fn answer(text: &str) -> bool {
    let mut input = Cursor::new(text.as_bytes().to_vec());
    let mut output = Vec::new();
    confirm(&BTreeSet::from([8000]), &mut input, &mut output).unwrap()
}

#[test]
fn only_yes_continues() {
    assert!(answer("y\n"));
    assert!(answer("Y\n"));
    assert!(answer("yes\n"));
    assert!(!answer("n\n"));
    assert!(!answer("\n"));
    assert!(!answer("sure\n"));
    assert!(!answer(""));
}

#[test]
fn prompt_lists_busy_ports() {
    let mut input = Cursor::new(b"n\n".to_vec());
    let mut output = Vec::new();

    confirm(&BTreeSet::from([8000, 8003]), &mut input, &mut output).unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("8000"));
    assert!(printed.contains("8003"));
    assert!(printed.contains("Continue anyway? (y/N)"));
}

#[test]
fn scan_falls_back_to_ss() {
    let runner = RecordingRunner::new()
        .fail_on("netstat")
        .respond("ss -tuln", LISTING);

    let busy = scan(&runner, &(8000..=8099));

    assert_eq!(busy, BTreeSet::from([8000, 8003]));
    assert_eq!(runner.calls(), vec!["netstat -tuln", "ss -tuln"]);
}

#[test]
fn scan_failure_means_no_conflicts() {
    let runner = RecordingRunner::new().fail_on("-tuln");

    assert!(scan(&runner, &(8000..=8099)).is_empty());
}

#[test]
fn declining_is_fatal() {
    let runner = RecordingRunner::new().respond("netstat", LISTING);
    let mut input = Cursor::new(b"n\n".to_vec());
    let mut output = Vec::new();

    let err = check(&runner, &(8000..=8099), false, &mut input, &mut output).unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, LaunchError::ConflictDeclined(ref p) if p.len() == 2));
}

#[test]
fn assume_yes_skips_prompt() {
    let runner = RecordingRunner::new().respond("netstat", LISTING);
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();

    let busy = check(&runner, &(8000..=8099), true, &mut input, &mut output).unwrap();

    assert_eq!(busy.len(), 2);
    assert!(output.is_empty());
}

#[test]
fn no_conflicts_never_prompts() {
    let runner = RecordingRunner::new();
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();

    let busy = check(&runner, &(8000..=8099), false, &mut input, &mut output).unwrap();

    assert!(busy.is_empty());
    assert!(output.is_empty());
}
