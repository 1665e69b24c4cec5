use serde::Deserialize;

use super::types::{MedicineDraft, StructuredDraft};
use super::FusionError;

/// Locate the JSON object embedded in a free-text reply: the greedy span from
/// the first `{` to the last `}`. The reasoning service is asked for bare
/// JSON but routinely wraps it in prose.
pub fn extract_json_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Best-effort decode of the reasoning service's reply into a draft.
///
/// Absent fields default to empty string / empty list; medicine entries that
/// fail to deserialize are skipped rather than rejecting the whole draft. A
/// missing span or undecodable JSON is an error the caller treats the same
/// as a service failure.
pub fn decode_draft(reply: &str) -> Result<StructuredDraft, FusionError> {
    let span = extract_json_span(reply)
        .ok_or_else(|| FusionError::MalformedReply("no JSON object in reply".into()))?;

    let raw: RawDraft =
        serde_json::from_str(span).map_err(|e| FusionError::JsonParsing(e.to_string()))?;

    Ok(StructuredDraft {
        doctor_name: raw.doctor_name.unwrap_or_default(),
        date: raw.date.unwrap_or_default(),
        medicines: parse_medicines_lenient(raw.medicines),
    })
}

#[derive(Deserialize)]
struct RawDraft {
    #[serde(default)]
    doctor_name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    medicines: Option<Vec<serde_json::Value>>,
}

/// Skip medicine entries that fail to deserialize.
fn parse_medicines_lenient(items: Option<Vec<serde_json::Value>>) -> Vec<MedicineDraft> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}
