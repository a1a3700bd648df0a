//! Output assertions, expected failures, retries, and gates

use crate::prelude::*;

#[test]
fn missing_output_fails_and_names_the_needle() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-output-contains=\"ZZZ\"\necho hello\n```",
    );
    let output = scenario.run();
    assert_failure(&output);
    assert!(stderr_of(&output).contains("ZZZ"));
}

#[test]
fn assert_failure_inverts_success() {
    let scenario = Scenario::new().doc("doc.md", "```bash docci-assert-failure\nfalse\n```");
    assert_success(&scenario.run());
}

#[test]
fn assert_failure_fails_when_commands_succeed() {
    let scenario = Scenario::new().doc("doc.md", "```bash docci-assert-failure\ntrue\n```");
    let output = scenario.run();
    assert_failure(&output);
    assert!(stderr_of(&output).contains("expected failure"));
}

#[test]
fn failing_block_reports_its_file_and_index() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash\ntrue\n```\n\n```bash\nexit 3\n```",
    );
    let output = scenario.run();
    assert_failure(&output);
    let stderr = stderr_of(&output);
    assert!(stderr.contains("doc.md"), "stderr: {stderr}");
    assert!(stderr.contains("block 1"), "stderr: {stderr}");
}

#[test]
fn retry_lets_a_flaky_command_pass() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-retry=2 docci-delay-per-cmd=0.05\ntest -f marker || { touch marker; exit 1; }\n```",
    );
    assert_success(&scenario.run());
}

#[test]
fn os_gate_skips_blocks_for_other_systems() {
    // no machine is both linux and darwin; one of these blocks must skip
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-os=linux\necho linux-side > gated.txt\n```\n\n```bash docci-os=mac\necho mac-side > gated.txt\n```",
    );
    assert_success(&scenario.run());
    let content = scenario.read("gated.txt");
    assert!(content == "linux-side\n" || content == "mac-side\n");
}

#[test]
fn ignored_blocks_do_not_execute() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-ignore\ntouch ignored-ran\n```\n\n```bash\ntrue\n```",
    );
    assert_success(&scenario.run());
    assert!(!scenario.path().join("ignored-ran").exists());
}
