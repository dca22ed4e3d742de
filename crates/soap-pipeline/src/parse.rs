use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use soap_types::{Result, SoapError, SOAP_SECTIONS};

static OPEN_JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```json\s*").unwrap());
static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```\s*").unwrap());
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").unwrap());

/// Characters of raw provider text quoted in parse errors.
const SNIPPET_CHARS: usize = 200;

/// Remove a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence.
pub fn strip_fences(text: &str) -> String {
    let cleaned = text.trim();
    let cleaned = OPEN_JSON_FENCE.replace(cleaned, "");
    let cleaned = OPEN_FENCE.replace(&cleaned, "");
    let cleaned = CLOSE_FENCE.replace(&cleaned, "");
    cleaned.trim().to_string()
}

/// Recover a JSON value from raw provider text.
///
/// Tries the fence-stripped text first, then the span from the first `{` to
/// the last `}`. The parsed value is returned as-is, whatever its shape.
pub fn parse_response(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Err(SoapError::Parse {
            message: "Empty response from API".into(),
        });
    }

    let cleaned = strip_fences(raw);
    let direct_err = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let span = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => Some(&cleaned[start..=end]),
        _ => None,
    };

    let message = match span {
        Some(extracted) => match serde_json::from_str::<Value>(extracted) {
            Ok(value) => {
                tracing::debug!("Recovered JSON object from surrounding text");
                return Ok(value);
            }
            Err(inner) => format!(
                "Failed to parse JSON response. Original error: {inner}. Response text: {}",
                snippet(raw)
            ),
        },
        None => format!(
            "Invalid JSON response: {direct_err}. Response text: {}",
            snippet(raw)
        ),
    };
    Err(SoapError::Parse { message })
}

fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}

/// Required sections that are absent or not strings in a parsed response.
pub fn missing_sections(value: &Value) -> Vec<&'static str> {
    SOAP_SECTIONS
        .iter()
        .copied()
        .filter(|key| !value[*key].is_string())
        .collect()
}
