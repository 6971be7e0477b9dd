//! The `/body/flags` pattern-string format and the match engine.
//!
//! A pattern string is the interchange format between generation, storage,
//! and matching: ASCII `/`, a non-empty body, `/`, zero or more flag
//! letters, no surrounding whitespace. This crate owns the decomposition
//! rule, the supported flag alphabet, compilation into an executable
//! matcher, and the `test_pattern` engine the UI layer calls against
//! stored or hand-edited patterns.

pub mod matcher;

pub use matcher::test_pattern;

use regex::{Regex, RegexBuilder};
use rf_types::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Flag letters the engine accepts.
///
/// `i`/`m`/`s` translate to matcher options. `g` is accepted and ignored
/// because matching is always global, and `u` is accepted and ignored
/// because the engine is Unicode-aware by default. `y` (sticky) has no
/// equivalent here and is rejected.
pub const SUPPORTED_FLAGS: &[char] = &['g', 'i', 'm', 's', 'u'];

/// Decomposition of a pattern string into its body and flag letters.
///
/// Re-composing with [`compose`] reproduces a string that parses back to
/// the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPattern {
    pub body: String,
    pub flags: String,
}

/// Split a pattern string into `{body, flags}`.
///
/// The body runs from after the leading `/` to the *last* `/`, so bodies
/// may themselves contain slashes; everything after the last `/` must be
/// lowercase ASCII letters to count as flags. Returns `None` for anything
/// that does not fit the shape, including an empty body.
pub fn parse(pattern: &str) -> Option<ParsedPattern> {
    let rest = pattern.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let body = &rest[..close];
    let flags = &rest[close + 1..];

    if body.is_empty() {
        return None;
    }
    if !flags.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }

    Some(ParsedPattern {
        body: body.to_string(),
        flags: flags.to_string(),
    })
}

/// Re-assemble a pattern string from its parts.
pub fn compose(body: &str, flags: &str) -> String {
    format!("/{}/{}", body, flags)
}

/// Check a flags string against the supported alphabet.
///
/// Fails fast on a letter outside [`SUPPORTED_FLAGS`] or a duplicated
/// letter, rather than deferring to a downstream compile error.
pub fn validate_flags(flags: &str) -> AppResult<()> {
    let mut seen = Vec::new();
    for c in flags.chars() {
        if !SUPPORTED_FLAGS.contains(&c) {
            return Err(AppError::InvalidFlags(format!(
                "unsupported flag '{}' in \"{}\"",
                c, flags
            )));
        }
        if seen.contains(&c) {
            return Err(AppError::InvalidFlags(format!(
                "duplicate flag '{}' in \"{}\"",
                c, flags
            )));
        }
        seen.push(c);
    }
    Ok(())
}

/// Compile a body + flags pair into an executable matcher.
pub fn compile(body: &str, flags: &str) -> AppResult<Regex> {
    validate_flags(flags)?;

    let mut builder = RegexBuilder::new(body);
    for c in flags.chars() {
        match c {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Global matching and Unicode mode are always on.
            'g' | 'u' => {}
            _ => unreachable!("validate_flags admits only supported letters"),
        }
    }

    builder
        .build()
        .map_err(|e| AppError::InvalidPattern(e.to_string()))
}

/// Whether a pattern string parses and compiles.
pub fn is_valid(pattern: &str) -> bool {
    match parse(pattern) {
        Some(parsed) => compile(&parsed.body, &parsed.flags).is_ok(),
        None => false,
    }
}
