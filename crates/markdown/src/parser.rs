// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fence extraction and tag tokenization.

use docci_core::{
    CodeBlock, CommandExec, Config, Delays, Endpoint, FileOp, LineRange, Tag, TagValueError,
    SCRIPTING_LANGUAGES,
};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Non-greedy across newlines: group 1 is the info line, group 2 the body.
#[allow(clippy::expect_used)]
static FENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(.*?)\n(.*?)```").expect("constant regex pattern is valid")
});

/// Errors raised while parsing a Markdown document into code blocks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid tag found in your documentation: {0}. Check the release notes for renamed tags")]
    UnknownTag(String),
    #[error(transparent)]
    Value(#[from] TagValueError),
}

/// Extract every fenced code block from `content`, in document order.
///
/// With a config, blocks whose language is not followed are marked ignored;
/// without one (parser-level tooling and tests) the default scripting set
/// applies and no language-based ignore is added.
pub fn parse_blocks(
    config: Option<&Config>,
    content: &str,
) -> Result<Vec<CodeBlock>, ParseError> {
    let content = strip_quoted_wrappers(content);

    let mut blocks = Vec::new();
    for captures in FENCE_PATTERN.captures_iter(&content) {
        let info_line = captures.get(1).map_or("", |m| m.as_str()).trim();
        let body = captures.get(2).map_or("", |m| m.as_str());

        let mut parts = info_line.split_whitespace();
        let language = parts.next().unwrap_or("").to_string();
        let tags = tokenize_tags(parts.collect::<Vec<_>>())?;

        blocks.push(build_block(config, &language, tags, body)?);
    }
    Ok(blocks)
}

/// Drop four-backtick lines that merely wrap a fenced block so documentation
/// about docci itself can quote runnable examples.
///
/// A ```` line is a wrapper when its adjacent line carries a ``` fence.
fn strip_quoted_wrappers(content: &str) -> String {
    if !content.contains("````") {
        return content.to_string();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut kept = String::new();
    for (i, line) in lines.iter().enumerate() {
        if line.contains("````") {
            let next_has_fence = lines.get(i + 1).is_some_and(|l| l.contains("```"));
            let prev_has_fence = i > 0 && lines[i - 1].contains("```");
            if next_has_fence || prev_has_fence {
                continue;
            }
        }
        kept.push_str(line);
        kept.push('\n');
    }
    if kept.is_empty() {
        content.to_string()
    } else {
        kept
    }
}

/// Validate raw info-line tokens and reassemble quoted values that were split
/// on whitespace (`docci-output-contains="My Multi Word"`).
fn tokenize_tags(raw: Vec<&str>) -> Result<Vec<String>, ParseError> {
    let raw: Vec<String> = raw.into_iter().map(str::to_string).collect();
    if let Some(unknown) = Tag::find_unknown(&raw) {
        return Err(ParseError::UnknownTag(unknown.clone()));
    }

    let mut tags = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        let token = &raw[i];
        if let Some(quote) = open_quote(token) {
            let mut joined = token.clone();
            let mut j = i + 1;
            while j < raw.len() && !raw[j].contains(quote) {
                joined.push(' ');
                joined.push_str(&raw[j]);
                j += 1;
            }
            if j < raw.len() {
                joined.push(' ');
                joined.push_str(&raw[j]);
                i = j;
            }
            tags.push(joined);
        } else {
            tags.push(token.clone());
        }
        i += 1;
    }
    Ok(tags)
}

/// The quote character of a token that opens a quoted value without closing
/// it on the same token.
fn open_quote(token: &str) -> Option<char> {
    for quote in ['"', '\''] {
        let opener = format!("={quote}");
        if token.contains(&opener) && !token.ends_with(quote) {
            return Some(quote);
        }
    }
    None
}

fn build_block(
    config: Option<&Config>,
    language: &str,
    tags: Vec<String>,
    body: &str,
) -> Result<CodeBlock, ParseError> {
    let scripting = match config {
        Some(c) => c.is_followed_language(language),
        None => SCRIPTING_LANGUAGES.contains(&language),
    };

    let mut ignored = Tag::Ignore.present_in(&tags);
    if let Some(config) = config {
        ignored = ignored || !config.is_followed_language(language);
    }

    // File-content blocks keep their body byte-for-byte; script bodies trim.
    let raw_content = if scripting {
        body.trim().to_string()
    } else {
        body.to_string()
    };

    let delays = Delays::parse(
        Tag::DelayPerCmd.value_in(&tags).as_deref(),
        Tag::DelayAfter.value_in(&tags).as_deref(),
    )?;

    let file_op = FileOp {
        file_name: Tag::File.value_in(&tags),
        content: raw_content.clone(),
        insert_at_line: parse_line_number(Tag::LineInsert.value_in(&tags))?,
        replace_lines: Tag::LineReplace
            .value_in(&tags)
            .map(|v| LineRange::parse(&v))
            .transpose()?,
        file_reset: Tag::ResetFile.present_in(&tags),
        if_file_not_exists: Tag::IfFileNotExists.value_in(&tags),
    };

    let endpoint = Tag::WaitForEndpoint
        .value_in(&tags)
        .map(|v| Endpoint::parse(&v))
        .transpose()?;

    let commands = if scripting {
        extract_commands(&raw_content)
    } else {
        Vec::new()
    };

    let retry_count = parse_retry(Tag::Retry.value_in(&tags))?;
    let command_exec = scripting.then(|| CommandExec {
        commands: commands.clone(),
        background: Tag::Background.present_in(&tags),
        output_contains: Tag::OutputContains.value_in(&tags),
        expect_failure: Tag::AssertFailure.present_in(&tags),
        machine_os: Tag::Os.value_in(&tags).map(|os| docci_core::alias_os(&os)),
        binary: Tag::IfNotInstalled.value_in(&tags),
        ignored,
        retry_count,
        if_file_not_exists: Tag::IfFileNotExists.value_in(&tags),
        replace_text: Tag::ReplaceText.value_in(&tags),
    });

    Ok(CodeBlock {
        language: language.to_string(),
        tags,
        raw_content,
        commands,
        ignored,
        file_op,
        endpoint,
        delays,
        command_exec,
    })
}

fn parse_line_number(value: Option<String>) -> Result<Option<i64>, TagValueError> {
    value
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| TagValueError::LineNumber(v.clone()))
        })
        .transpose()
}

fn parse_retry(value: Option<String>) -> Result<u32, TagValueError> {
    match value {
        None => Ok(0),
        Some(v) => v.parse::<u32>().map_err(|_| TagValueError::Retry(v)),
    }
}

/// Derive the command list from a script body: drop comment lines, cut
/// trailing `#` comments, collapse blank runs.
fn extract_commands(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|line| line.find('#').map_or(line, |i| &line[..i]))
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
