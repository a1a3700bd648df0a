// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP readiness polling for `docci-wait-for-endpoint`.

use crate::error::EngineError;
use docci_core::Endpoint;
use std::time::{Duration, Instant};

/// Default pause between attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll `endpoint.url` until it answers, failing once `max_timeout_seconds`
/// of wall clock have elapsed without a response.
///
/// Connectivity is the readiness signal: any HTTP response counts, including
/// 4xx/5xx. The GET runs on the blocking pool so the poll loop never stalls
/// the executor.
pub async fn wait_for_endpoint(
    endpoint: &Endpoint,
    interval: Duration,
) -> Result<(), EngineError> {
    let deadline = Duration::from_secs(endpoint.max_timeout_seconds);
    let started = Instant::now();
    let mut attempt: u32 = 1;

    tracing::info!(url = %endpoint.url, timeout_secs = endpoint.max_timeout_seconds, "waiting for endpoint");
    loop {
        if probe(&endpoint.url).await {
            tracing::info!(url = %endpoint.url, attempt, "endpoint is up");
            return Ok(());
        }
        if started.elapsed() > deadline {
            return Err(EngineError::EndpointTimeout(endpoint.url.clone()));
        }
        tracing::info!(url = %endpoint.url, "endpoint not up yet, trying again. Try number: {attempt}");
        tokio::time::sleep(interval).await;
        attempt += 1;
    }
}

async fn probe(url: &str) -> bool {
    let url = url.to_string();
    let result = tokio::task::spawn_blocking(move || {
        match ureq::get(&url).call() {
            Ok(_) => true,
            // an error status is still an answer
            Err(ureq::Error::Status(_, _)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    })
    .await;
    result.unwrap_or(false)
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
