//! Generation pipeline
//!
//! Turns a natural-language description into a validated, delimiter-wrapped
//! pattern string by prompting a chat model and then coercing its free-form
//! reply through an ordered chain of recovery stages. The model is treated
//! as adversarial: every stage assumes the prompt's format instructions
//! were ignored.
//!
//! Stage order (policy, see `recover`): validate flags → prompt → one
//! upstream call → strip noise → locate delimited line → wrap bare line →
//! reject template echo → repair body → guards → category backstop →
//! final compile.

pub mod categories;
pub mod prompt;
pub mod recover;

use rf_types::{AppError, AppResult, ChatClient, GenerationRequest};
use tracing::{debug, info, warn};

/// Generate a pattern string for `request.description`.
///
/// Succeeds only with a string that parses as `/body/flags` and compiles;
/// the composed pattern always carries the *requested* flags, whatever
/// flag letters the model emitted. Fails with [`AppError::InvalidFlags`]
/// before any network traffic when the requested flags are unsupported,
/// with [`AppError::Upstream`] when the chat call fails, and with
/// [`AppError::InvalidPattern`] when no stage could salvage a compilable
/// body.
pub async fn generate(client: &dyn ChatClient, request: &GenerationRequest) -> AppResult<String> {
    rf_pattern::validate_flags(&request.flags)?;

    let prompt = prompt::build_prompt(&request.description, &request.flags);
    let raw = client.chat(&request.model, &prompt).await?;
    debug!("Raw model response ({} bytes): {:?}", raw.len(), raw);

    let body = recover_body(&raw, request);

    let body = match (body, categories::recognize(&request.description)) {
        // Recognized category: the candidate must prove itself against the
        // canonical probes or be replaced by the reference pattern.
        (Some(body), Some(cat)) => match rf_pattern::compile(&body, &request.flags) {
            Ok(re) if cat.satisfied_by(&re) => body,
            _ => {
                info!(
                    "Candidate failed {:?} probes, substituting reference pattern",
                    cat.keywords
                );
                cat.reference_body.to_string()
            }
        },
        (Some(body), None) => body,
        (None, Some(cat)) => {
            info!(
                "No usable candidate in response, substituting {:?} reference pattern",
                cat.keywords
            );
            cat.reference_body.to_string()
        }
        (None, None) => {
            return Err(AppError::InvalidPattern(
                "no pattern could be recovered from the model response".to_string(),
            ));
        }
    };

    rf_pattern::compile(&body, &request.flags)?;
    Ok(rf_pattern::compose(&body, &request.flags))
}

/// Run the text-level recovery stages, yielding a candidate body or
/// nothing if the response was unsalvageable.
fn recover_body(raw: &str, request: &GenerationRequest) -> Option<String> {
    let cleaned = recover::strip_noise(raw);

    let candidate = recover::find_delimited(&cleaned)
        .or_else(|| recover::wrap_bare(&cleaned, &request.flags))?;
    debug!("Candidate pattern: {:?}", candidate);

    // The model's own flag letters are discarded; the requested flags are
    // applied at composition time.
    let parsed = rf_pattern::parse(&candidate)?;
    if recover::is_template_echo(&parsed) {
        warn!("Model echoed the prompt template instead of a pattern");
        return None;
    }

    let body = recover::repair_body(&parsed.body);
    if let Some(reason) = recover::guard_reject(&body) {
        warn!("Rejecting candidate body: {}", reason);
        return None;
    }

    Some(body)
}
