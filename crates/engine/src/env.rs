// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run's mutable environment overlay.
//!
//! docci never calls `std::env::set_var`: variables exported by blocks live
//! in an [`EnvMap`] owned by the driver. Spawn sites layer the overlay on top
//! of the parent process environment, so every child sees a snapshot of the
//! state at spawn time while the overlay itself is only ever mutated on the
//! main task.

use std::collections::BTreeMap;

/// Ordered key → value overlay applied to every spawned command.
pub type EnvMap = BTreeMap<String, String>;

/// The full environment a command spawned right now would observe: the parent
/// process environment with the overlay applied.
pub fn effective_env(overlay: &EnvMap) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = std::env::vars().collect();
    for (key, value) in overlay {
        env.insert(key.clone(), value.clone());
    }
    env
}

/// Parse the output of `env` into key/value pairs.
///
/// Lines without `=` (e.g. continuation lines of multi-line values) are
/// skipped; for gating purposes only simple values matter.
pub fn parse_env_dump(dump: &str) -> BTreeMap<String, String> {
    dump.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Keys whose value in `after` is new or changed relative to `before`.
pub fn diff_env(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> EnvMap {
    after
        .iter()
        .filter(|(key, value)| before.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
