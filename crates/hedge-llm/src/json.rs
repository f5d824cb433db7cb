//! JSON extraction from free-text oracle responses
//!
//! Oracle output is free text expected to contain one JSON object. The
//! helpers here scan for the first `{...}` span, strip markdown code-fence
//! markers, collapse whitespace, and parse - falling back to an explicit
//! per-call-site default when the shape does not match.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tracing::warn;

// unwrap: the pattern is a compile-time constant
#[allow(clippy::unwrap_used)]
fn json_span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap())
}

/// Locate and clean the first `{...}` span in a response
///
/// Returns `None` when no braced span is present at all.
pub fn extract_json(text: &str) -> Option<String> {
    let span = json_span_pattern().find(text)?.as_str();
    let cleaned = span.replace("```json", "").replace("```", "");
    let cleaned = cleaned.replace('\n', " ").replace("\\n", " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(collapsed)
}

/// Parse the JSON object embedded in `raw` into `T`, or return `default`
///
/// Every recovery path is logged; unparsable oracle output degrades to the
/// caller's documented fallback value instead of erroring.
pub fn parse_or_default<T: DeserializeOwned>(raw: &str, default: T) -> T {
    let Some(cleaned) = extract_json(raw) else {
        warn!("oracle response contained no JSON object, using fallback");
        return default;
    };
    match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "failed to parse oracle JSON, using fallback");
            default
        }
    }
}
