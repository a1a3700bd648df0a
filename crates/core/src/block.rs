// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed code-block records produced by the Markdown parser.
//!
//! Everything here is immutable after parse; the engine reads these records
//! and never writes them back.

use thiserror::Error;

/// A tag value that failed its typed conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagValueError {
    #[error("invalid delay value: {0}")]
    Delay(String),
    #[error("invalid line number: {0}")]
    LineNumber(String),
    #[error("invalid line range: {0}")]
    LineRange(String),
    #[error("invalid retry count: {0}")]
    Retry(String),
    #[error("invalid endpoint timeout in: {0}")]
    EndpointTimeout(String),
}

/// Pre-command and post-block sleeps, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delays {
    pub cmd: f64,
    pub post: f64,
}

impl Delays {
    pub fn parse(cmd: Option<&str>, post: Option<&str>) -> Result<Delays, TagValueError> {
        let parse = |raw: Option<&str>| -> Result<f64, TagValueError> {
            match raw {
                None => Ok(0.0),
                Some(s) => s
                    .parse::<f64>()
                    .map_err(|_| TagValueError::Delay(s.to_string())),
            }
        };
        Ok(Delays {
            cmd: parse(cmd)?,
            post: parse(post)?,
        })
    }
}

/// An HTTP readiness gate: poll `url` until it answers or `max_timeout_seconds`
/// elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub max_timeout_seconds: u64,
}

impl Endpoint {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Parse the `URL` or `URL|SECONDS` wire format.
    pub fn parse(input: &str) -> Result<Endpoint, TagValueError> {
        match input.split_once('|') {
            Some((url, timeout)) => {
                let secs = timeout
                    .parse::<u64>()
                    .map_err(|_| TagValueError::EndpointTimeout(input.to_string()))?;
                Ok(Endpoint {
                    url: url.to_string(),
                    max_timeout_seconds: secs,
                })
            }
            None => Ok(Endpoint {
                url: input.to_string(),
                max_timeout_seconds: Self::DEFAULT_TIMEOUT_SECS,
            }),
        }
    }
}

/// A 1-based line target: `N` alone or an inclusive `N-M` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: i64,
    pub end: Option<i64>,
}

impl LineRange {
    pub fn parse(input: &str) -> Result<LineRange, TagValueError> {
        let int = |s: &str| {
            s.parse::<i64>()
                .map_err(|_| TagValueError::LineRange(input.to_string()))
        };
        match input.split_once('-') {
            Some((start, end)) => Ok(LineRange {
                start: int(start)?,
                end: Some(int(end)?),
            }),
            None => Ok(LineRange {
                start: int(input)?,
                end: None,
            }),
        }
    }
}

/// Declarative file mutation carried by a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOp {
    pub file_name: Option<String>,
    pub content: String,
    pub insert_at_line: Option<i64>,
    pub replace_lines: Option<LineRange>,
    pub file_reset: bool,
    pub if_file_not_exists: Option<String>,
}

/// Command execution settings for a scripting-language block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandExec {
    pub commands: Vec<String>,
    pub background: bool,
    pub output_contains: Option<String>,
    pub expect_failure: bool,
    pub machine_os: Option<String>,
    pub binary: Option<String>,
    pub ignored: bool,
    pub retry_count: u32,
    pub if_file_not_exists: Option<String>,
    pub replace_text: Option<String>,
}

/// One fenced code block, with its tags resolved into typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: String,
    pub tags: Vec<String>,
    /// Block body. Trimmed and comment-stripped for scripting languages,
    /// byte-for-byte otherwise (file-content sources).
    pub raw_content: String,
    pub commands: Vec<String>,
    pub ignored: bool,
    pub file_op: FileOp,
    pub endpoint: Option<Endpoint>,
    pub delays: Delays,
    pub command_exec: Option<CommandExec>,
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
