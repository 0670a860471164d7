// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

use std::env;
use std::ffi::OsStr;

/// Retrieves a boolean value from the given environment variable.
///
/// The following string values are considered true: `true` or `1`.
///
/// Returns `false` if the variable is not defined or contains an invalid value.
pub fn bool_from_env<K: AsRef<OsStr>>(key: K) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or_default()
}

/// Retrieves a trimmed, non-empty value from the given environment variable.
///
/// Returns `None` if the variable is not defined or holds only whitespace.
pub fn non_empty_from_env<K: AsRef<OsStr>>(key: K) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_variable_is_false_and_none() {
        assert!(!bool_from_env("SB_TEST_UNDEFINED_VARIABLE"));
        assert_eq!(None, non_empty_from_env("SB_TEST_UNDEFINED_VARIABLE"));
    }
}
