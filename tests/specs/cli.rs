//! CLI surface: arguments, config resolution, exit codes

use crate::prelude::*;

#[test]
fn no_arguments_exits_one_with_usage_hint() {
    let output = docci(&[]);
    assert_failure(&output);
    assert!(stderr_of(&output).contains("config"));
}

#[test]
fn tags_flag_prints_table_and_exits_zero() {
    let output = docci(&["--tags"]);
    assert_success(&output);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Tags and their aliases:"));
    assert!(stdout.contains("docci-ignore"));
    assert!(stdout.contains("docci-output-contains (Aliases:"));
    assert!(stdout.contains("docci-reset-file"));
}

#[test]
fn invalid_json_blob_exits_one() {
    let output = docci(&["{definitely not json"]);
    assert_failure(&output);
    assert!(stderr_of(&output).contains("Error"));
}

#[test]
fn directory_without_config_json_exits_one() {
    let scenario = Scenario::new();
    let output = docci(&[&scenario.path().display().to_string()]);
    assert_failure(&output);
    assert!(stderr_of(&output).contains("config.json"));
}

#[test]
fn config_loads_from_file_and_directory() {
    let scenario = Scenario::new().doc("doc.md", "```bash\ntrue\n```");

    // as a file path
    let config_path = scenario.path().join("config.json");
    std::fs::write(&config_path, scenario.config("")).unwrap();
    assert_success(&docci(&[&config_path.display().to_string()]));

    // as a directory containing config.json
    assert_success(&docci(&[&scenario.path().display().to_string()]));
}

#[test]
fn unknown_tag_fails_the_run() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-definitely-unknown\necho hi\n```",
    );
    let output = scenario.run();
    assert_failure(&output);
    assert!(stderr_of(&output).contains("docci-definitely-unknown"));
}
