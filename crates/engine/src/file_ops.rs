// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative file mutation: create, reset, insert, replace.
//!
//! Line numbers are 1-based throughout; a negative insert position counts
//! from the end of the file.

use crate::error::EngineError;
use docci_core::FileOp;
use std::path::{Path, PathBuf};

/// Apply a block's file operation. Returns whether anything was applied;
/// `false` means the block has no file target (or its skip gate fired) and
/// command execution should proceed.
pub fn apply(op: &FileOp, working_dir: Option<&Path>) -> Result<bool, EngineError> {
    let Some(file_name) = &op.file_name else {
        return Ok(false);
    };
    let path = resolve(file_name, working_dir);

    if let Some(guard) = &op.if_file_not_exists {
        if resolve(guard, working_dir).exists() {
            tracing::debug!(path = %path.display(), "skipping file operation, guard path exists");
            return Ok(false);
        }
    }

    let content = normalized(&op.content);

    if !path.exists() || op.file_reset {
        tracing::debug!(path = %path.display(), reset = op.file_reset, "writing file");
        std::fs::write(&path, &content).map_err(EngineError::FileOp)?;
    }

    let text = std::fs::read_to_string(&path).map_err(EngineError::FileOp)?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    if let Some(at) = op.insert_at_line {
        let index = if at > 0 {
            at - 1
        } else {
            lines.len() as i64 + at + 1
        };
        let index = index.clamp(0, lines.len() as i64) as usize;
        lines.insert(index, content.trim_end_matches('\n').to_string());
    }

    if let Some(range) = op.replace_lines {
        let block = content.trim_end_matches('\n').to_string();
        let start = (range.start - 1).max(0) as usize;
        match range.end {
            Some(end) => {
                let start = start.min(lines.len());
                let end = (end.max(0) as usize).clamp(start, lines.len());
                let tail = lines.split_off(end);
                lines.truncate(start);
                lines.push(block);
                lines.extend(tail);
            }
            None => {
                if start >= lines.len() {
                    lines.push(block);
                } else {
                    lines[start] = block;
                }
            }
        }
    }

    let joined = if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    };
    std::fs::write(&path, joined).map_err(EngineError::FileOp)?;

    Ok(true)
}

/// A path from a tag value, resolved against the configured working dir.
pub fn resolve(file_name: &str, working_dir: Option<&Path>) -> PathBuf {
    match working_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

// Written content always carries exactly one trailing newline.
fn normalized(content: &str) -> String {
    let mut out = content.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

#[cfg(test)]
#[path = "file_ops_tests.rs"]
mod tests;
