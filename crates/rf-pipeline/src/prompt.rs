//! Prompt construction for the generation request.
//!
//! The wording here is a tuning parameter, not a contract: the recovery
//! stages never assume the model actually obeyed it.

/// Build the user prompt for a description and the requested flag suffix.
///
/// States the task, demands the exact `/PATTERN/<flags>` shape, gives a
/// few worked examples, and forbids prose and code fences.
pub fn build_prompt(description: &str, flags: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Write ONLY a regex pattern for: {}\n\n",
        description
    ));
    prompt.push_str("CRITICAL: Your entire response must be ONLY the pattern itself.\n");
    prompt.push_str("Do not write any explanations or text.\n");
    prompt.push_str("Do not include code blocks.\n\n");
    prompt.push_str(&format!("Format: /PATTERN/{}\n\n", flags));
    prompt.push_str("Examples:\n");
    prompt.push_str(&format!(
        "For \"email\": /[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{{2,}}/{}\n",
        flags
    ));
    prompt.push_str(&format!(
        "For \"phone\": /\\d{{3}}[-.]?\\d{{3}}[-.]?\\d{{4}}/{}\n",
        flags
    ));
    prompt.push_str(&format!("For \"postcode\": /^[0-9]{{4}}$/{}\n\n", flags));
    prompt.push_str("Return ONLY the pattern, nothing else.");

    prompt
}
