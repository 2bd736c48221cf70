// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! MIME type compatibility checks.
//!
//! Only the `type/subtype` essence takes part in matching; parameters such as
//! `; charset=utf-8` are ignored and comparison is case-insensitive.

/// Strip parameters and normalize case: `Image/TIFF; x=y` -> `image/tiff`.
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether `candidate` satisfies `pattern`.
///
/// `pattern` may be `*/*`, `type/*` or an exact `type/subtype`. An empty or
/// malformed candidate never matches.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    let pattern = essence(pattern);
    let candidate = essence(candidate);

    let Some((candidate_type, candidate_subtype)) = candidate.split_once('/') else {
        return false;
    };
    if candidate_type.is_empty() || candidate_subtype.is_empty() {
        return false;
    }

    match pattern.split_once('/') {
        Some(("*", "*")) => true,
        Some((pattern_type, "*")) => pattern_type == candidate_type,
        Some(_) => pattern == candidate,
        None => false,
    }
}
