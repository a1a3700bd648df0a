// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the CLI.
//!
//! Engine diagnostics go to stderr so stdout stays clean for mirrored
//! command output. `DOCCI_LOG` (or `RUST_LOG`) overrides the level; the
//! config's `debugging` flag lifts the default from info to debug.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(debugging: bool) {
    let default_level = if debugging { "debug" } else { "info" };

    let filter = EnvFilter::try_from_env("DOCCI_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
