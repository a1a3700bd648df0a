// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command substitution and env-assignment recognition.
//!
//! Values destined for the run's environment are substituted here, in the
//! parent, so later commands observe them. Substitution inside ordinary
//! commands is left to the shell that runs them; doing it twice would be
//! wrong.

use crate::env::EnvMap;
use crate::error::EngineError;
use crate::runner;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static BACKTICK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static DOLLAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\((.*?)\)").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static EXPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^export\s+([A-Za-z_][A-Za-z0-9_]*)=(.*)$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static INLINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*=[^ ]+(?: [A-Za-z_][A-Za-z0-9_]*=[^ ]+)*) (.+)$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static STANDALONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("constant regex pattern is valid")
});

/// Evaluate every `` `cmd` `` and `$(cmd)` in `value`, replacing each match
/// with the command's trimmed output.
///
/// The leftmost match is resolved first and the string is re-scanned after
/// every replacement, so nested substitutions converge: the inner shell
/// resolves its own nesting, and anything it prints back gets re-scanned
/// here.
pub async fn substitute(
    value: &str,
    cwd: Option<&Path>,
    overlay: &EnvMap,
) -> Result<String, EngineError> {
    let mut result = value.to_string();

    for pattern in [&BACKTICK_PATTERN, &DOLLAR_PATTERN] {
        loop {
            let Some((range, command)) = pattern.captures(&result).and_then(|captures| {
                let range = captures.get(0)?.range();
                let command = captures.get(1).map_or("", |m| m.as_str()).to_string();
                Some((range, command))
            }) else {
                break;
            };

            let ran = runner::run_foreground(&command, cwd, overlay, false).await?;
            if !ran.success() {
                tracing::debug!(%command, status = ran.status, "substitution command failed");
            }
            result.replace_range(range, ran.output.trim());
        }
    }
    Ok(result)
}

/// Recognize the env-defining command forms and return the variables they
/// bind, with values substituted.
///
/// Three forms, on a trimmed line: `export KEY=VALUE`, one or more inline
/// `KEY=VALUE` pairs before a command, and a standalone `KEY=VALUE`. Anything
/// else binds nothing (the command itself still runs).
pub async fn parse_env(
    command: &str,
    cwd: Option<&Path>,
    overlay: &EnvMap,
) -> Result<EnvMap, EngineError> {
    let mut vars = EnvMap::new();
    if !command.contains('=') {
        return Ok(vars);
    }
    let trimmed = command.trim();

    if let Some(captures) = EXPORT_PATTERN.captures(trimmed) {
        let key = captures.get(1).map_or("", |m| m.as_str());
        let raw = captures.get(2).map_or("", |m| m.as_str());
        let value = substitute(raw, cwd, overlay).await?;
        vars.insert(key.to_string(), value);
        return Ok(vars);
    }

    if let Some(captures) = INLINE_PATTERN.captures(trimmed) {
        let pairs = captures.get(1).map_or("", |m| m.as_str());
        for pair in pairs.split_whitespace() {
            if let Some((key, raw)) = pair.split_once('=') {
                let value = substitute(raw, cwd, overlay).await?;
                vars.insert(key.to_string(), value);
            }
        }
        return Ok(vars);
    }

    if let Some(captures) = STANDALONE_PATTERN.captures(trimmed) {
        let key = captures.get(1).map_or("", |m| m.as_str());
        let raw = captures.get(2).map_or("", |m| m.as_str());
        let value = substitute(raw, cwd, overlay).await?;
        vars.insert(key.to_string(), value);
    }
    Ok(vars)
}

#[cfg(test)]
#[path = "substitute_tests.rs"]
mod tests;
