// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning of documentation commands through the system shell.
//!
//! Foreground commands are waited on and captured; background commands are
//! detached, given a streaming stdout reader, and registered for teardown.
//! `source` lines get special handling so their environment side effects
//! survive into later blocks.

use crate::env::{self, EnvMap};
use crate::error::EngineError;
use crate::registry::{BackgroundHandle, ProcessRegistry};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Shell every command runs under.
const SHELL: &str = "bash";

/// Marker separating a `source` command's own output from the env dump we
/// append to it.
const SOURCE_ENV_DELIM: &str = "___DOCCI_SOURCE_ENV___";

/// Reset sequence written before mirrored output so a child that died
/// mid-ANSI-escape doesn't bleed color into ours.
const COLOR_RESET: &str = "\x1b[0m";

/// Consumes one line of a background process's stdout.
pub type LineConsumer = Arc<dyn Fn(&str) + Send + Sync>;

/// Result of a foreground command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundOutput {
    pub status: i32,
    pub output: String,
}

impl ForegroundOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Reject commands that are known to silently misbehave under `bash -c`
/// before anything is spawned.
///
/// `forge script` invocations carrying escaped double quotes lose their
/// quoting when re-wrapped by the shell and end up executing a different
/// transaction than documented.
pub fn validate_command(command: &str) -> Result<(), EngineError> {
    if command.contains("forge script") && command.contains("\\\"") {
        return Err(EngineError::Validation(format!(
            "`forge script` commands must not contain escaped quotes (\\\"); \
             rewrite the quoting in: {command}"
        )));
    }
    Ok(())
}

fn shell_command(command: &str, cwd: Option<&Path>, overlay: &EnvMap) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    // overlay on top of the inherited parent environment: a snapshot of the
    // run state at spawn time
    cmd.envs(overlay);
    cmd
}

/// Run a command to completion, capturing stdout and stderr.
///
/// When `mirror` is set the captured bytes are echoed to our own stdout and
/// stderr. Output text is normalized: `\r\n` to `\n`, trailing whitespace
/// trimmed.
pub async fn run_foreground(
    command: &str,
    cwd: Option<&Path>,
    overlay: &EnvMap,
    mirror: bool,
) -> Result<ForegroundOutput, EngineError> {
    validate_command(command)?;

    tracing::debug!(%command, "running foreground");
    let output = shell_command(command, cwd, overlay)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| EngineError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if mirror {
        mirror_bytes(&output.stdout, &output.stderr);
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let text = text.replace("\r\n", "\n").trim_end().to_string();

    Ok(ForegroundOutput {
        status: output.status.code().unwrap_or(-1),
        output: text,
    })
}

// Pass raw bytes through so the child's color codes survive; prefix a reset
// in case the previous child aborted mid-escape.
fn mirror_bytes(stdout: &[u8], stderr: &[u8]) {
    if !stdout.is_empty() {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(COLOR_RESET.as_bytes());
        let _ = out.write_all(stdout);
        let _ = out.flush();
    }
    if !stderr.is_empty() {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(COLOR_RESET.as_bytes());
        let _ = err.write_all(stderr);
        let _ = err.flush();
    }
}

/// Spawn a command detached and register it for teardown.
///
/// A trailing ` &` is redundant under a controlled spawn and is stripped. The
/// returned pid is alive at return time; the child's stdout is drained by a
/// dedicated task that feeds `consumer` (default: echo to our stdout). EOF or
/// a closed descriptor ends the reader quietly.
pub async fn spawn_background(
    command: &str,
    cwd: Option<&Path>,
    overlay: &EnvMap,
    registry: &ProcessRegistry,
    consumer: Option<LineConsumer>,
) -> Result<u32, EngineError> {
    let command = command.trim();
    let command = command.strip_suffix('&').unwrap_or(command).trim_end();

    let mut child = shell_command(command, cwd, overlay)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| EngineError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let pid = child.id().unwrap_or(0);
    let consumer = consumer.unwrap_or_else(default_consumer);
    let stdout = child.stdout.take();
    let reader = tokio::spawn(async move {
        let Some(stdout) = stdout else { return };
        let mut lines = BufReader::new(stdout).lines();
        // Err covers EOF-adjacent failures (EBADF after kill): end quietly
        while let Ok(Some(line)) = lines.next_line().await {
            consumer(&line);
        }
    });

    tracing::info!(pid, %command, "spawned background process");
    registry.add(BackgroundHandle::new(pid, child, reader), command);
    Ok(pid)
}

fn default_consumer() -> LineConsumer {
    Arc::new(|line: &str| {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    })
}

/// Whether a command line is a `source` invocation.
pub fn is_source_command(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("source"))
}

/// Run a `source` command and merge its environment side effects back into
/// the overlay.
///
/// The command is rewritten to dump `env` after sourcing; everything after
/// the delimiter is diffed against the pre-spawn environment and the
/// added/changed keys are written into `overlay`. Nothing is echoed for a
/// successful source.
pub async fn run_source(
    command: &str,
    cwd: Option<&Path>,
    overlay: &mut EnvMap,
) -> Result<ForegroundOutput, EngineError> {
    let before = env::effective_env(overlay);
    let wrapped = format!("{command} && echo {SOURCE_ENV_DELIM} && env");
    let result = run_foreground(&wrapped, cwd, overlay, false).await?;

    if !result.success() {
        return Ok(ForegroundOutput {
            status: result.status,
            output: result.output,
        });
    }

    let dump = result
        .output
        .rsplit_once(SOURCE_ENV_DELIM)
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let after = env::parse_env_dump(dump);
    let mut changed = env::diff_env(&before, &after);
    // shell bookkeeping, not author exports
    for key in ["SHLVL", "PWD", "OLDPWD", "_"] {
        changed.remove(key);
    }
    if !changed.is_empty() {
        tracing::debug!(keys = ?changed.keys().collect::<Vec<_>>(), "source exported variables");
    }
    overlay.extend(changed);

    Ok(ForegroundOutput {
        status: 0,
        output: String::new(),
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
