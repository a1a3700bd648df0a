//! Environment persistence across blocks and files

use crate::prelude::*;

#[test]
fn export_with_substitution_flows_to_later_blocks() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash\nexport FOO=`echo 42`\n```\n\n```bash docci-output-contains=\"42\"\necho $FOO\n```",
    );
    let output = scenario.run();
    assert_success(&output);
    assert!(stdout_of(&output).contains("42"));
}

#[test]
fn inline_assignment_persists_beyond_its_command() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash\nGREETING=hello true\n```\n\n```bash docci-output-contains=\"hello\"\necho $GREETING\n```",
    );
    assert_success(&scenario.run());
}

#[test]
fn sourced_variables_flow_to_later_blocks() {
    let scenario = Scenario::new()
        .file("vars.sh", "export SOURCED=from-script\n")
        .doc(
            "doc.md",
            "```bash\nsource vars.sh\n```\n\n```bash docci-output-contains=\"from-script\"\necho $SOURCED\n```",
        );
    assert_success(&scenario.run());
}

#[test]
fn config_env_vars_are_visible_to_all_blocks() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-output-contains=\"configured\"\necho $FROM_CONFIG\n```",
    );
    let output = scenario.run_with(r#", "env_vars": {"FROM_CONFIG": "configured"}"#);
    assert_success(&output);
}

#[test]
fn env_flows_across_files_in_order() {
    let scenario = Scenario::new()
        .doc("01-first.md", "```bash\nexport CHAIN=linked\n```")
        .doc(
            "02-second.md",
            "```bash docci-output-contains=\"linked\"\necho $CHAIN\n```",
        );
    assert_success(&scenario.run());
}
