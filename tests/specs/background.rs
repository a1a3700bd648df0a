//! Background process lifecycle and teardown

use crate::prelude::*;
use std::time::Duration;

fn pid_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[test]
fn background_processes_are_terminated_on_exit() {
    // the background command records its own pid, then becomes a long sleep
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-background\nsh -c 'echo $$ > child.pid; exec sleep 3600'\n```\n\n```bash\nsleep 0.3\n```",
    );

    let output = scenario.run();
    assert_success(&output);

    let pid: u32 = scenario.read("child.pid").trim().parse().unwrap();
    // the run is over; the sleeper must be gone
    std::thread::sleep(Duration::from_millis(200));
    assert!(!pid_alive(pid), "background pid {pid} survived the run");
}

#[test]
fn background_block_does_not_stall_the_run() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-background\nsleep 3600\n```\n\n```bash docci-output-contains=\"after\"\necho after\n```",
    );

    let started = std::time::Instant::now();
    let output = scenario.run();
    assert_success(&output);
    // nowhere near the sleep duration
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[test]
fn excluded_prefixes_run_foreground_inside_background_blocks() {
    let scenario = Scenario::new().doc(
        "doc.md",
        "```bash docci-background docci-output-contains=\"visible\"\necho visible\n```",
    );
    let output = scenario.run();
    assert_success(&output);
    assert!(stdout_of(&output).contains("visible"));
}
