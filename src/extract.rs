//! Best-effort JSON payload extraction from free-form model output.
//!
//! The reasoning service is asked for pure JSON but its output format is
//! not contractually guaranteed: responses may wrap the object in a
//! markdown fence or embed it in prose. Every call site that recovers a
//! structured payload from model text goes through [`extract_json`] so
//! the fencing and brace-matching rules live in exactly one place.

/// Extract the JSON object span from a model response.
///
/// Rules, in priority order:
/// 1. A ```` ```json ```` fenced block → its interior (trimmed).
/// 2. The first `{` with character-by-character brace-depth tracking to
///    the close brace that returns depth to zero.
/// 3. Neither pattern → `None`.
#[must_use]
pub fn extract_json(raw: &str) -> Option<&str> {
    if let Some(fenced) = extract_fenced(raw) {
        return Some(fenced);
    }
    extract_braced(raw)
}

/// Extract and parse a JSON object in one step.
///
/// Returns `None` on extraction failure or if the span is not valid
/// JSON for `T`. Parse failures are the caller's cue to fall back; this
/// function never errors.
#[must_use]
pub fn extract_and_parse<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    let span = extract_json(raw)?;
    serde_json::from_str(span).ok()
}

fn extract_fenced(raw: &str) -> Option<&str> {
    let start = raw.find("```json")?;
    let interior = &raw[start + "```json".len()..];
    let end = interior.find("```")?;
    Some(interior[..end].trim())
}

fn extract_braced(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in raw[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
