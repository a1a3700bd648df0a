// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Author-declared sleeps around command execution.

use docci_core::Delays;
use std::time::Duration;

/// Which of a block's two delays to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    /// Before each command.
    Cmd,
    /// After the block.
    Post,
}

/// Sleep for the configured delay; zero is a no-op. Whole seconds tick a
/// countdown log so long waits are visibly alive.
pub async fn handle(delays: &Delays, kind: DelayKind) {
    let seconds = match kind {
        DelayKind::Cmd => delays.cmd,
        DelayKind::Post => delays.post,
    };
    sleep_with_countdown(seconds, kind).await;
}

async fn sleep_with_countdown(seconds: f64, kind: DelayKind) {
    if seconds <= 0.0 {
        return;
    }
    tracing::info!(seconds, ?kind, "sleeping");

    let whole = seconds.floor() as u64;
    for remaining in (1..=whole).rev() {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tracing::debug!(remaining, "sleep");
    }
    let fraction = seconds - whole as f64;
    if fraction > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(fraction)).await;
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
