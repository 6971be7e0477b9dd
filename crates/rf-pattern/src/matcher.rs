//! Match engine: apply a pattern string to subject text.

use rf_types::MatchResult;
use tracing::debug;

/// Run `pattern` against `subject` and collect every non-overlapping
/// whole-match substring, left to right.
///
/// Never fails loudly: a string that does not parse as `/body/flags`, a
/// body that does not compile, or an unsupported flag all come back as
/// `{ matches: [], is_valid: false }`. Matching is always global — the
/// full match list is returned whether or not `g` is present. Capture
/// groups are discarded; only whole-match text is reported.
pub fn test_pattern(pattern: &str, subject: &str) -> MatchResult {
    let parsed = match crate::parse(pattern) {
        Some(parsed) => parsed,
        None => {
            debug!("pattern {:?} does not fit /body/flags", pattern);
            return MatchResult::invalid();
        }
    };

    let re = match crate::compile(&parsed.body, &parsed.flags) {
        Ok(re) => re,
        Err(e) => {
            debug!("pattern {:?} failed to compile: {}", pattern, e);
            return MatchResult::invalid();
        }
    };

    let matches = re
        .find_iter(subject)
        .map(|m| m.as_str().to_string())
        .collect();

    MatchResult::valid(matches)
}
