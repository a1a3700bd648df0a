// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for block execution

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while executing documentation blocks.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Pre-flight rejection of a command the shell would mangle.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("command `{command}` failed with status {status}: {output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    #[error("`{expected}` is not found in any command output")]
    OutputAssertion { expected: String },

    #[error("expected failure but command succeeded")]
    ExpectedFailure,

    #[error("endpoint not up in timeout period: {0}")]
    EndpointTimeout(String),

    #[error("invalid format for docci-replace-text. Expected format: 'text;ENV_VAR', got '{0}'")]
    ReplaceTextSpec(String),

    #[error("environment variable '{0}' not set. Required by docci-replace-text")]
    ReplaceTextEnv(String),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("file operation failed: {0}")]
    FileOp(#[source] std::io::Error),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] docci_markdown::ParseError),

    #[error("interrupted")]
    Interrupted,

    /// A block failure, annotated with where it came from.
    #[error("Error ({path}, block {index}): {source}")]
    Block {
        path: String,
        index: usize,
        #[source]
        source: Box<EngineError>,
    },

    /// A whole-file failure (parse errors have no block index yet).
    #[error("Error ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Annotate an error with the file and block it came from.
    pub fn at_block(self, path: &str, index: usize) -> EngineError {
        EngineError::Block {
            path: path.to_string(),
            index,
            source: Box::new(self),
        }
    }

    /// Annotate an error with the file it came from.
    pub fn at_file(self, path: &str) -> EngineError {
        EngineError::File {
            path: path.to_string(),
            source: Box::new(self),
        }
    }
}
