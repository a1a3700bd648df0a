// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration: which files to test and how.
//!
//! The configuration is JSON on disk. `Config::load` accepts a path to a
//! config file, a directory containing `config.json`, or a literal JSON blob
//! so CI pipelines can inline it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Languages whose blocks are executed as shell commands. Blocks in any other
/// language are file-content sources.
pub const SCRIPTING_LANGUAGES: [&str; 5] = ["shell", "bash", "sh", "zsh", "ksh"];

fn default_followed_languages() -> Vec<String> {
    SCRIPTING_LANGUAGES.iter().map(|l| l.to_string()).collect()
}

fn default_file_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

/// Errors raised while resolving or decoding a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config.json not found in directory: {0}")]
    MissingConfigJson(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Markdown files or directories to walk, processed in order.
    pub paths: Vec<String>,
    /// Environment merged into the run before any block executes.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
    /// Commands run before the first file, output discarded.
    #[serde(default)]
    pub pre_cmds: Vec<String>,
    /// Commands run after the registry drain, output discarded.
    #[serde(default)]
    pub cleanup_cmds: Vec<String>,
    /// Commands skipped verbatim wherever they appear in a block.
    #[serde(default)]
    pub ignore_commands: Vec<String>,
    /// Working directory for every spawned command and file operation.
    #[serde(default)]
    pub working_dir: Option<String>,
    #[serde(default = "default_followed_languages")]
    pub followed_languages: Vec<String>,
    #[serde(default = "default_file_extensions")]
    pub supported_file_extensions: Vec<String>,
    /// Lifts the default log level to debug.
    #[serde(default)]
    pub debugging: bool,
}

impl Config {
    /// Resolve `input` as a config file path, a directory holding
    /// `config.json`, or an inline JSON blob, in that order.
    pub fn load(input: &str) -> Result<Config, ConfigError> {
        let path = Path::new(input);
        if path.is_dir() {
            let candidate = path.join("config.json");
            if !candidate.is_file() {
                return Err(ConfigError::MissingConfigJson(candidate));
            }
            return Self::load_file(&candidate);
        }
        if path.is_file() {
            return Self::load_file(path);
        }
        Ok(serde_json::from_str(input)?)
    }

    fn load_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Whether `language` executes as shell commands under this config.
    pub fn is_followed_language(&self, language: &str) -> bool {
        self.followed_languages.iter().any(|l| l == language)
    }

    /// Enumerate the files each configured path contributes.
    ///
    /// A file path contributes itself. A directory is walked recursively and
    /// contributes every file whose extension is supported, sorted
    /// lexicographically. Paths keep their configuration order.
    pub fn collect_files(&self) -> Vec<(String, Vec<PathBuf>)> {
        self.paths
            .iter()
            .map(|path| (path.clone(), self.files_under(Path::new(path))))
            .collect()
    }

    fn files_under(&self, path: &Path) -> Vec<PathBuf> {
        if !path.is_dir() {
            return vec![path.to_path_buf()];
        }
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| self.has_supported_extension(p))
            .collect();
        files.sort();
        files
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.supported_file_extensions.iter().any(|e| e == ext),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
