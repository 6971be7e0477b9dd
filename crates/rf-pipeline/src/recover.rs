//! Recovery stages applied to raw model output.
//!
//! Each stage is a pure function from text to text-or-rejection, run in a
//! fixed order by [`crate::generate`]: strip noise, locate a delimited
//! line, fall back to wrapping a bare line, reject template echoes,
//! repair known damage, then guard against prose. The order is policy,
//! documented here rather than implied by call sites.

use once_cell::sync::Lazy;
use regex::Regex;
use rf_pattern::ParsedPattern;

/// Longest body the pipeline will accept; anything bigger is prose
const MAX_BODY_LEN: usize = 256;

/// Lowercased prose markers from the prompt's own instructional vocabulary.
/// Their presence in a candidate body means the model answered in words.
const PROSE_MARKERS: &[&str] = &["explanation", "the pattern", "for example", "nothing else"];

/// A code-fence marker line, with optional language tag (```regex)
static FENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*```[a-zA-Z0-9_-]*\s*$").expect("static regex"));

static DELIMITED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/.+/[a-z]*$").expect("static regex"));

/// Characters that make a bare line look like a regex rather than prose
static REGEX_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[\]{}()^$\w\\*+?]").expect("static regex"));

static DOUBLED_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\\([dwsDWS])").expect("static regex"));

static LEAKED_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)explanation:|pattern:|example:").expect("static regex"));

static UPPERCASE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{10,}").expect("static regex"));

/// Remove code-fence markers and stray backticks, then trim.
///
/// Only the fencing goes, never its contents — models routinely wrap the
/// one correct pattern in a fence despite being told not to.
pub fn strip_noise(raw: &str) -> String {
    let without_fences = FENCE_MARKER.replace_all(raw, "");
    without_fences.replace('`', "").trim().to_string()
}

/// Find the first line already shaped like `/body/flags`.
///
/// Policy: the *first* matching line wins — models that disobey the
/// prompt tend to lead with the pattern and follow with commentary.
pub fn find_delimited(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| DELIMITED_LINE.is_match(line))
        .map(str::to_string)
}

/// Fallback for undelimited output: take the first line that contains
/// regex-looking characters and wrap it as `/line/flags`.
pub fn wrap_bare(text: &str, flags: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && REGEX_CHARS.is_match(line))
        .map(|line| rf_pattern::compose(line, flags))
}

/// True when the model echoed the prompt's `/PATTERN/` placeholder back
/// instead of substituting content.
pub fn is_template_echo(parsed: &ParsedPattern) -> bool {
    parsed.body.eq_ignore_ascii_case("pattern")
}

/// Narrow character-level repairs for known model failure modes:
/// collapse doubled shorthand-class escapes (`\\d` → `\d`, likewise
/// `w`/`s` in either case) and strip leaked instruction labels. This is
/// not general regex normalization.
pub fn repair_body(body: &str) -> String {
    let collapsed = DOUBLED_ESCAPE.replace_all(body, r"\$1");
    LEAKED_LABEL.replace_all(&collapsed, "").trim().to_string()
}

/// Reject bodies that look like prose rather than a pattern. Returns the
/// rejection reason, or `None` when the body passes.
pub fn guard_reject(body: &str) -> Option<&'static str> {
    if body.len() > MAX_BODY_LEN {
        return Some("body exceeds maximum length");
    }
    if UPPERCASE_RUN.is_match(body) {
        return Some("body contains a long uppercase run");
    }
    let lowered = body.to_lowercase();
    if PROSE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Some("body contains prompt vocabulary");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_noise_removes_fences_and_backticks() {
        assert_eq!(strip_noise("`/\\d+/g`"), "/\\d+/g");
        assert_eq!(strip_noise("  /abc/g  \n"), "/abc/g");
    }

    #[test]
    fn strip_noise_keeps_fenced_contents() {
        assert_eq!(strip_noise("```regex\n/\\d+/g\n```"), "/\\d+/g");
        assert_eq!(strip_noise("```\n/\\d+/g\n```"), "/\\d+/g");
    }

    #[test]
    fn find_delimited_takes_first_matching_line() {
        let text = "Here you go:\n/\\d+/g\n/[a-z]+/i";
        assert_eq!(find_delimited(text).as_deref(), Some("/\\d+/g"));
    }

    #[test]
    fn find_delimited_trims_lines() {
        assert_eq!(find_delimited("   /abc/g   ").as_deref(), Some("/abc/g"));
    }

    #[test]
    fn find_delimited_rejects_prose() {
        assert!(find_delimited("The pattern you want is probably this one").is_none());
    }

    #[test]
    fn wrap_bare_wraps_regex_looking_line() {
        let wrapped = wrap_bare("\\d{3}-\\d{4}", "g").unwrap();
        assert_eq!(wrapped, "/\\d{3}-\\d{4}/g");
    }

    #[test]
    fn wrap_bare_skips_empty_lines() {
        let wrapped = wrap_bare("\n\n[a-z]+\n", "i").unwrap();
        assert_eq!(wrapped, "/[a-z]+/i");
    }

    #[test]
    fn template_echo_is_detected_case_insensitively() {
        for echo in ["/PATTERN/g", "/pattern/g"] {
            let parsed = rf_pattern::parse(echo).unwrap();
            assert!(is_template_echo(&parsed));
        }
        let parsed = rf_pattern::parse("/\\d+/g").unwrap();
        assert!(!is_template_echo(&parsed));
    }

    #[test]
    fn repair_collapses_doubled_escapes() {
        assert_eq!(repair_body(r"\\d{3}-\\s\\w+"), r"\d{3}-\s\w+");
        assert_eq!(repair_body(r"\\D\\W"), r"\D\W");
        // Already-single escapes are left alone
        assert_eq!(repair_body(r"\d+"), r"\d+");
    }

    #[test]
    fn repair_strips_leaked_labels() {
        assert_eq!(repair_body(r"Pattern: \d+"), r"\d+");
        assert_eq!(repair_body(r"\d+ example:"), r"\d+");
    }

    #[test]
    fn guards_reject_prose_shapes() {
        assert!(guard_reject(&"a".repeat(300)).is_some());
        assert!(guard_reject("THISISNOTAPATTERN").is_some());
        assert!(guard_reject("here is the pattern you asked").is_some());
    }

    #[test]
    fn guards_pass_ordinary_bodies() {
        assert!(guard_reject(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").is_none());
        // Short uppercase sequences are legitimate in classes and literals
        assert!(guard_reject("ABC[DEF]").is_none());
    }
}
