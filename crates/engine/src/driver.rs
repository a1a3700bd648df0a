// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run driver: iterates files and blocks, owns the run state, and
//! guarantees teardown.

use crate::env::EnvMap;
use crate::error::EngineError;
use crate::executor;
use crate::registry::ProcessRegistry;
use crate::runner;
use docci_core::Config;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a run mutates: the environment overlay and the background
/// process registry, plus the immutable configuration.
pub struct RunContext {
    pub config: Config,
    pub working_dir: Option<PathBuf>,
    pub env: EnvMap,
    pub registry: Arc<ProcessRegistry>,
}

impl RunContext {
    pub fn new(config: Config) -> Self {
        let working_dir = config.working_dir.as_ref().map(PathBuf::from);
        Self {
            config,
            working_dir,
            env: EnvMap::new(),
            registry: Arc::new(ProcessRegistry::new()),
        }
    }
}

/// Run every configured file's blocks in order.
///
/// Returns the first block failure, annotated with its file and index. The
/// registry drain and the cleanup commands run on every exit path, including
/// user interruption.
pub async fn run(config: Config) -> Result<(), EngineError> {
    let mut ctx = RunContext::new(config);
    run_with(&mut ctx).await
}

/// [`run`] against caller-owned state, so callers can inspect the context
/// afterwards.
pub async fn run_with(ctx: &mut RunContext) -> Result<(), EngineError> {
    let result = tokio::select! {
        result = run_all(ctx) => result,
        _ = wait_for_interrupt() => {
            tracing::warn!("interrupted, quitting");
            Err(EngineError::Interrupted)
        }
    };

    // teardown happens regardless of how the run ended
    ctx.registry.cleanup();
    run_hook_commands(&ctx.config.cleanup_cmds, &ctx.env).await;

    result
}

// Resolves only on a real ctrl-c. If no signal listener can be registered,
// park forever so the run itself decides when we're done.
async fn wait_for_interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn run_all(ctx: &mut RunContext) -> Result<(), EngineError> {
    run_hook_commands(&ctx.config.pre_cmds, &ctx.env).await;

    let configured: Vec<(String, String)> = ctx
        .config
        .env_vars
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    ctx.env.extend(configured);

    for (_parent, files) in ctx.config.collect_files() {
        for file in files {
            run_file(&file, ctx).await?;
        }
    }
    Ok(())
}

async fn run_file(file: &std::path::Path, ctx: &mut RunContext) -> Result<(), EngineError> {
    tracing::info!(file = %file.display(), "processing");
    let content = std::fs::read_to_string(file).map_err(|source| EngineError::ReadFile {
        path: file.to_path_buf(),
        source,
    })?;

    let blocks = docci_markdown::parse_blocks(Some(&ctx.config), &content)
        .map_err(|e| EngineError::from(e).at_file(&file.display().to_string()))?;
    for (index, block) in blocks.iter().enumerate() {
        tracing::debug!(index, language = %block.language, "running block");
        if let Err(err) = executor::run_block(block, ctx).await {
            return Err(err.at_block(&file.display().to_string(), index));
        }
    }
    Ok(())
}

/// Run pre/cleanup hook commands, discarding output. Hook failures are
/// logged, never fatal.
async fn run_hook_commands(commands: &[String], env: &EnvMap) {
    for command in commands {
        tracing::debug!(%command, "running hook command");
        match runner::run_foreground(command, None, env, false).await {
            Ok(result) if !result.success() => {
                tracing::warn!(%command, status = result.status, "hook command failed");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%command, error = %e, "hook command error"),
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
