//! Endpoint readiness gating

use crate::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn serve_http(listener: TcpListener) {
    while let Ok((mut stream, _)) = listener.accept() {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n");
    }
}

#[test]
fn run_waits_for_a_late_server() {
    let port = free_port();
    let scenario = Scenario::new().doc(
        "doc.md",
        &format!(
            "```bash docci-wait-for-endpoint=http://127.0.0.1:{port}|5 docci-output-contains=\"up\"\necho up\n```"
        ),
    );

    // the server only appears 1.5s into the run
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(1500));
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
            serve_http(listener);
        }
    });

    let output = scenario.run();
    assert_success(&output);
    assert!(stdout_of(&output).contains("up"));
}

#[test]
fn unreachable_endpoint_times_out_with_exit_one() {
    let port = free_port();
    let scenario = Scenario::new().doc(
        "doc.md",
        &format!("```bash docci-wait-for-endpoint=http://127.0.0.1:{port}|1\necho never\n```"),
    );

    let started = std::time::Instant::now();
    let output = scenario.run();
    assert_failure(&output);
    assert!(stderr_of(&output).contains("endpoint"));
    // bounded by max_timeout plus poll slack
    assert!(started.elapsed() < Duration::from_secs(10));
}
