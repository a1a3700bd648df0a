// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of fence tags and their aliases.
//!
//! Tags are space-separated tokens on a code fence's info line, either bare
//! markers (`docci-ignore`) or `name=value` pairs. Values may be quoted with
//! `"` or `'` to carry spaces; `\"`/`\'` and `\\` escapes are honored inside
//! the chosen quote.

/// Reserved prefix for all docci tags. Tokens starting with this prefix that
/// don't resolve to a known tag are a parse error, not a silent skip.
pub const TAG_PREFIX: &str = "docci-";

/// A canonical fence tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Ignore,
    Background,
    DelayAfter,
    DelayPerCmd,
    WaitForEndpoint,
    IfNotInstalled,
    OutputContains,
    AssertFailure,
    Os,
    IfFileNotExists,
    File,
    LineInsert,
    LineReplace,
    ResetFile,
    Retry,
    ReplaceText,
}

impl Tag {
    /// Every canonical tag, in `--tags` listing order.
    pub const ALL: [Tag; 16] = [
        Tag::Ignore,
        Tag::Background,
        Tag::DelayAfter,
        Tag::DelayPerCmd,
        Tag::WaitForEndpoint,
        Tag::IfNotInstalled,
        Tag::OutputContains,
        Tag::AssertFailure,
        Tag::Os,
        Tag::IfFileNotExists,
        Tag::File,
        Tag::LineInsert,
        Tag::LineReplace,
        Tag::ResetFile,
        Tag::Retry,
        Tag::ReplaceText,
    ];

    /// The canonical token for this tag.
    pub fn canonical(self) -> &'static str {
        match self {
            Tag::Ignore => "docci-ignore",
            Tag::Background => "docci-background",
            Tag::DelayAfter => "docci-delay-after",
            Tag::DelayPerCmd => "docci-delay-per-cmd",
            Tag::WaitForEndpoint => "docci-wait-for-endpoint",
            Tag::IfNotInstalled => "docci-if-not-installed",
            Tag::OutputContains => "docci-output-contains",
            Tag::AssertFailure => "docci-assert-failure",
            Tag::Os => "docci-os",
            Tag::IfFileNotExists => "docci-if-file-not-exists",
            Tag::File => "docci-file",
            Tag::LineInsert => "docci-line-insert",
            Tag::LineReplace => "docci-line-replace",
            Tag::ResetFile => "docci-reset-file",
            Tag::Retry => "docci-retry",
            Tag::ReplaceText => "docci-replace-text",
        }
    }

    /// Accepted aliases for this tag (renames kept for older documentation).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Tag::Background => &["docci-bg"],
            Tag::DelayAfter => &["docci-after-delay"],
            Tag::DelayPerCmd => &["docci-cmd-delay"],
            Tag::OutputContains => &[
                "docci-contains-output",
                "docci-expected-output",
                "docci-contains",
            ],
            Tag::AssertFailure => &["docci-expect-failure", "docci-should-fail"],
            Tag::Os => &["docci-machine"],
            Tag::File => &["docci-file-name"],
            Tag::LineInsert => &["docci-insert-at-line", "docci-insert-line"],
            Tag::LineReplace => &["docci-replace-at-line", "docci-replace-line"],
            _ => &[],
        }
    }

    /// Resolve a token (with any `=value` suffix) to its canonical tag.
    pub fn from_token(token: &str) -> Option<Tag> {
        let name = token.split_once('=').map_or(token, |(name, _)| name);
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.canonical() == name || tag.aliases().contains(&name))
    }

    /// Whether a token names a known tag or alias.
    pub fn is_valid_token(token: &str) -> bool {
        Tag::from_token(token).is_some()
    }

    /// Whether this tag (or any alias) is present as a bare token.
    pub fn present_in(self, tags: &[String]) -> bool {
        tags.iter().any(|token| {
            token == self.canonical() || self.aliases().iter().any(|alias| token == alias)
        })
    }

    /// Extract the value of the first `tag=value` token matching this tag or
    /// one of its aliases, with quote handling.
    pub fn value_in(self, tags: &[String]) -> Option<String> {
        let names = std::iter::once(self.canonical()).chain(self.aliases().iter().copied());
        let names: Vec<&str> = names.collect();
        for token in tags {
            for name in &names {
                if let Some(rest) = token.strip_prefix(name) {
                    if let Some(value) = rest.strip_prefix('=') {
                        return Some(unquote(value));
                    }
                }
            }
        }
        None
    }

    /// First token with the reserved prefix that is not a known tag or alias.
    pub fn find_unknown(tags: &[String]) -> Option<&String> {
        tags.iter()
            .filter(|token| token.starts_with(TAG_PREFIX))
            .find(|token| !Tag::is_valid_token(token))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Strip an optional surrounding quote from a tag value.
///
/// If the value opens with `"` or `'`, that character is the closing quote;
/// inside, `\<quote>` yields a literal quote, `\\` a literal backslash, any
/// other backslash is preserved, and the first unescaped matching quote ends
/// the value. Unquoted values pass through unchanged.
fn unquote(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let quote = match chars.first() {
        Some(&c) if c == '"' || c == '\'' => c,
        _ => return raw.to_string(),
    };

    let mut out = String::with_capacity(raw.len());
    let mut i = 1;
    while i < chars.len() {
        if chars[i] == '\\' && i + 1 < chars.len() {
            if chars[i + 1] == quote {
                out.push(quote);
                i += 2;
                continue;
            } else if chars[i + 1] == '\\' {
                out.push('\\');
                i += 2;
                continue;
            }
        } else if chars[i] == quote {
            break;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Render the canonical tag table for `--tags`.
pub fn tag_listing() -> String {
    let mut out = String::from("Tags and their aliases:\n=======================\n");
    for tag in Tag::ALL {
        let aliases = tag.aliases();
        if aliases.is_empty() {
            out.push_str(&format!("- {}\n", tag.canonical()));
        } else {
            out.push_str(&format!(
                "- {} (Aliases: {})\n",
                tag.canonical(),
                aliases.join(", ")
            ));
        }
    }
    out
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
