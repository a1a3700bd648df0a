//! Declarative file mutations driven from docs

use crate::prelude::*;

#[test]
fn line_replace_is_one_based() {
    let scenario = Scenario::new()
        .file("a.txt", "one\ntwo\nthree\n")
        .doc("doc.md", "```text docci-file=a.txt docci-line-replace=2\nTWO\n```");
    assert_success(&scenario.run());
    assert_eq!(scenario.read("a.txt"), "one\nTWO\nthree\n");
}

#[test]
fn line_replace_range_collapses_lines() {
    let scenario = Scenario::new()
        .file("a.txt", "one\ntwo\nthree\nfour\n")
        .doc(
            "doc.md",
            "```text docci-file=a.txt docci-line-replace=2-3\nMID\n```",
        );
    assert_success(&scenario.run());
    assert_eq!(scenario.read("a.txt"), "one\nMID\nfour\n");
}

#[test]
fn missing_target_is_created_from_block_content() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```toml docci-file=config.toml\n[section]\nkey = 1\n```",
    );
    assert_success(&scenario.run());
    assert_eq!(scenario.read("config.toml"), "[section]\nkey = 1\n");
}

#[test]
fn reset_file_is_idempotent_across_runs() {
    let scenario = Scenario::new()
        .file("a.txt", "stale\n")
        .doc(
            "doc.md",
            "```text docci-file=a.txt docci-reset-file\nfresh\n```",
        );
    assert_success(&scenario.run());
    let first = scenario.read("a.txt");
    assert_eq!(first, "fresh\n");

    assert_success(&scenario.run());
    assert_eq!(scenario.read("a.txt"), first);
}

#[test]
fn line_insert_prepends_before_the_line() {
    let scenario = Scenario::new()
        .file("a.txt", "one\ntwo\n")
        .doc(
            "doc.md",
            "```text docci-file=a.txt docci-line-insert=1\nZERO\n```",
        );
    assert_success(&scenario.run());
    assert_eq!(scenario.read("a.txt"), "ZERO\none\ntwo\n");
}

#[test]
fn negative_line_insert_appends_at_eof() {
    let scenario = Scenario::new()
        .file("a.txt", "one\ntwo\n")
        .doc(
            "doc.md",
            "```text docci-file=a.txt docci-line-insert=-1\nEND\n```",
        );
    assert_success(&scenario.run());
    assert_eq!(scenario.read("a.txt"), "one\ntwo\nEND\n");
}

#[test]
fn script_block_with_file_tag_writes_instead_of_running() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-file=script.sh\ntouch executed\n```",
    );
    assert_success(&scenario.run());
    assert_eq!(scenario.read("script.sh"), "touch executed\n");
    assert!(!scenario.path().join("executed").exists());
}
