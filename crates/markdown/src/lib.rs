// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! docci-markdown: fenced code-block extraction.
//!
//! Turns a Markdown document into the ordered list of typed [`CodeBlock`]
//! records the engine executes. Parsing is pure; nothing here touches the
//! filesystem or spawns processes.
//!
//! [`CodeBlock`]: docci_core::CodeBlock

mod parser;

pub use parser::{parse_blocks, ParseError};
