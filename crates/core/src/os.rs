// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operating-system name normalization for `docci-os` gating.

/// Alias common OS spellings to a single name.
///
/// `ubuntu`/`debian`/`wsl` collapse to `linux`; `macos`/`mac` to `darwin`.
/// Anything else is lowercased unchanged.
pub fn alias_os(os: &str) -> String {
    match os.to_lowercase().as_str() {
        "ubuntu" | "debian" | "wsl" => "linux".to_string(),
        "macos" | "mac" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// The running machine's OS name, aliased the same way authored values are.
pub fn current_os() -> String {
    alias_os(std::env::consts::OS)
}

#[cfg(test)]
#[path = "os_tests.rs"]
mod tests;
