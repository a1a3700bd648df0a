// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! docci - runs the commands in your documentation and fails when they don't
//! behave as written

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use docci_core::Config;

#[derive(Parser)]
#[command(
    name = "docci",
    version,
    about = "Executes your documentation's code blocks against a real environment"
)]
struct Cli {
    /// Config file path, a directory containing config.json, or a literal
    /// JSON config blob
    config: Option<String>,

    /// Print the tag/alias table and exit
    #[arg(long)]
    tags: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.tags {
        print!("{}", docci_core::tag_listing());
        return Ok(());
    }

    let Some(input) = cli.config else {
        anyhow::bail!(
            "missing config: pass a config file, a directory containing config.json, or a JSON blob"
        );
    };

    let config = Config::load(&input).context("failed to load configuration")?;
    logging::init(config.debugging);

    docci_engine::run(config).await?;
    Ok(())
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
