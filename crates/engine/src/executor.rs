// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-block execution: gates, file ops, the command loop, retries, and
//! assertions.

use crate::delay::{self, DelayKind};
use crate::driver::RunContext;
use crate::endpoint;
use crate::env;
use crate::error::EngineError;
use crate::file_ops;
use crate::runner;
use crate::substitute;
use docci_core::{CodeBlock, CommandExec, Config, Delays};
use std::time::Duration;

/// Commands whose first word never goes to the background, even inside a
/// `docci-background` block. They either finish instantly or mutate state
/// later commands depend on.
const BACKGROUND_EXCLUDED_PREFIXES: [&str; 6] = ["cp", "export", "cd", "mkdir", "echo", "cat"];

/// Pause between retry attempts when the block has no per-command delay.
const DEFAULT_RETRY_DELAY_SECS: f64 = 2.0;

/// Run one block: endpoint gate, then file op, then commands, stopping at the
/// first stage that fully handles the block.
pub async fn run_block(block: &CodeBlock, ctx: &mut RunContext) -> Result<(), EngineError> {
    if let Some(endpoint) = &block.endpoint {
        endpoint::wait_for_endpoint(endpoint, endpoint::DEFAULT_POLL_INTERVAL).await?;
    }

    if file_ops::apply(&block.file_op, ctx.working_dir.as_deref())? {
        return Ok(());
    }

    if let Some(exec) = &block.command_exec {
        run_commands(exec, &block.delays, ctx).await?;
    }
    Ok(())
}

/// Why a foreground command's final attempt is considered settled.
enum CommandVerdict {
    Succeeded(String),
    Failed { status: i32, output: String },
}

async fn run_commands(
    exec: &CommandExec,
    delays: &Delays,
    ctx: &mut RunContext,
) -> Result<(), EngineError> {
    if should_skip_block(exec, ctx) {
        return Ok(());
    }

    let last_effective = exec
        .commands
        .iter()
        .rposition(|c| !should_skip_command(c, &ctx.config));

    let mut outputs: Vec<String> = Vec::new();
    let mut had_error = false;

    for (index, command) in exec.commands.iter().enumerate() {
        if should_skip_command(command, &ctx.config) {
            continue;
        }

        // Bind env assignments before the spawn so this command's variables
        // persist for every later command and block.
        let bound = substitute::parse_env(command, ctx.working_dir.as_deref(), &ctx.env).await?;
        if !bound.is_empty() {
            tracing::debug!(keys = ?bound.keys().collect::<Vec<_>>(), "environment updated");
        }
        ctx.env.extend(bound);

        let background = exec.background && !is_excluded_from_background(command);

        let command = match &exec.replace_text {
            Some(spec) => apply_replace_text(command, spec, ctx)?,
            None => command.clone(),
        };

        delay::handle(delays, DelayKind::Cmd).await;

        if background {
            runner::spawn_background(
                &command,
                ctx.working_dir.as_deref(),
                &ctx.env,
                &ctx.registry,
                None,
            )
            .await?;
            continue;
        }

        let is_last = Some(index) == last_effective;
        match run_with_retries(&command, exec, delays, is_last, &outputs, ctx).await? {
            CommandVerdict::Succeeded(output) => outputs.push(output),
            CommandVerdict::Failed { status, output } => {
                if !exec.expect_failure {
                    return Err(EngineError::CommandFailed {
                        command,
                        status,
                        output,
                    });
                }
                had_error = true;
                outputs.push(output);
            }
        }
    }

    if let Some(expected) = &exec.output_contains {
        if !outputs.join("\n").contains(expected.as_str()) {
            tracing::error!(%expected, "output assertion failed");
            return Err(EngineError::OutputAssertion {
                expected: expected.clone(),
            });
        }
    }

    if exec.expect_failure && !had_error {
        return Err(EngineError::ExpectedFailure);
    }

    delay::handle(delays, DelayKind::Post).await;
    Ok(())
}

/// Run one foreground command up to `retry_count + 1` times.
///
/// A retry fires on a non-zero status, or (for the block's last effective
/// command) when the `output_contains` substring is still missing from the
/// accumulated output. Between attempts we pause for the block's command
/// delay, defaulting to two seconds.
async fn run_with_retries(
    command: &str,
    exec: &CommandExec,
    delays: &Delays,
    is_last: bool,
    prior_outputs: &[String],
    ctx: &mut RunContext,
) -> Result<CommandVerdict, EngineError> {
    let max_attempts = exec.retry_count + 1;
    let mut attempt = 0;

    loop {
        attempt += 1;
        if attempt > 1 {
            tracing::info!(%command, attempt, max_attempts, "executing command");
        } else {
            tracing::debug!(%command, attempt, max_attempts, "executing command");
        }

        let result = if runner::is_source_command(command) {
            runner::run_source(command, ctx.working_dir.as_deref(), &mut ctx.env).await?
        } else {
            runner::run_foreground(command, ctx.working_dir.as_deref(), &ctx.env, true).await?
        };

        let assertion_unmet = exec.output_contains.as_ref().is_some_and(|expected| {
            is_last && {
                let mut combined = prior_outputs.join("\n");
                combined.push('\n');
                combined.push_str(&result.output);
                !combined.contains(expected.as_str())
            }
        });

        if result.success() && !assertion_unmet {
            return Ok(CommandVerdict::Succeeded(result.output));
        }

        if attempt >= max_attempts {
            if !result.success() {
                return Ok(CommandVerdict::Failed {
                    status: result.status,
                    output: result.output,
                });
            }
            // exit status was fine; let the block-level assertion report the
            // missing output
            return Ok(CommandVerdict::Succeeded(result.output));
        }

        tracing::info!(
            %command,
            attempt,
            max_attempts,
            failed_status = !result.success(),
            "command unsettled, retrying"
        );
        let pause = if delays.cmd > 0.0 {
            delays.cmd
        } else {
            DEFAULT_RETRY_DELAY_SECS
        };
        tokio::time::sleep(Duration::from_secs_f64(pause)).await;
    }
}

/// Block-level opt-outs: any hit means the block "succeeds" without running.
fn should_skip_block(exec: &CommandExec, ctx: &RunContext) -> bool {
    if exec.ignored {
        tracing::debug!(commands = ?exec.commands, "ignoring commands");
        return true;
    }

    if let Some(guard) = &exec.if_file_not_exists {
        let path = file_ops::resolve(guard, ctx.working_dir.as_deref());
        if path.exists() {
            tracing::debug!(path = %path.display(), "skipping commands, file exists");
            return true;
        }
    }

    if let Some(os) = &exec.machine_os {
        let current = docci_core::current_os();
        if os != &current {
            tracing::debug!(wanted = %os, %current, "skipping commands, OS mismatch");
            return true;
        }
    }

    if let Some(binary) = &exec.binary {
        if binary_on_path(binary) {
            tracing::debug!(%binary, "skipping commands, binary already installed");
            return true;
        }
    }

    false
}

fn should_skip_command(command: &str, config: &Config) -> bool {
    let trimmed = command.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || config.ignore_commands.iter().any(|c| c == command)
}

fn is_excluded_from_background(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .is_some_and(|word| BACKGROUND_EXCLUDED_PREFIXES.contains(&word))
}

/// Substitute `TEXT;ENV` in a command: every occurrence of `TEXT` becomes the
/// current value of `$ENV`.
fn apply_replace_text(
    command: &str,
    spec: &str,
    ctx: &RunContext,
) -> Result<String, EngineError> {
    let parts: Vec<&str> = spec.split(';').collect();
    let [text, var] = parts.as_slice() else {
        return Err(EngineError::ReplaceTextSpec(spec.to_string()));
    };

    let environment = env::effective_env(&ctx.env);
    let value = environment
        .get(*var)
        .ok_or_else(|| EngineError::ReplaceTextEnv(var.to_string()))?;

    tracing::debug!(%text, %var, %value, "replacing text in command");
    Ok(command.replace(text, value))
}

fn binary_on_path(binary: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(binary).is_file())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
