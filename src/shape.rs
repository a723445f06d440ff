//! Pure transforms from raw model output to shaped values. No I/O, no state.

use serde::Deserialize;

use crate::error::EngineError;
use crate::gateway::SourceRef;

/// Report text used when the model's JSON carried no usable `report` field.
pub const NO_REPORT: &str = "No report generated.";

const FENCE: &str = "```";

/// Locate the inner content of the first fenced code block: an opening ```
/// with an optional word-character language tag, a newline, inner content,
/// and a closing ```.
fn find_fenced_block(raw: &str) -> Option<std::ops::Range<usize>> {
    let mut from = 0;
    while let Some(rel) = raw[from..].find(FENCE) {
        let tag_start = from + rel + FENCE.len();

        // Opening line must be ``` plus an optional \w+ tag, nothing else.
        if let Some(nl_rel) = raw[tag_start..].find('\n') {
            let tag = &raw[tag_start..tag_start + nl_rel];
            let tag_ok = tag
                .trim_end_matches('\r')
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');
            if tag_ok {
                let inner_start = tag_start + nl_rel + 1;
                if let Some(close_rel) = raw[inner_start..].find(FENCE) {
                    return Some(inner_start..inner_start + close_rel);
                }
            }
        }

        from = tag_start;
    }
    None
}

/// Inner content of the first fenced code block, trimmed. Falls back to the
/// whole input when no fenced block exists (the model sometimes answers with
/// bare code).
pub fn extract_code(raw: &str) -> String {
    match find_fenced_block(raw) {
        Some(inner) => raw[inner].trim().to_string(),
        None => raw.to_string(),
    }
}

/// The input with every fenced code block removed, trimmed. An unclosed
/// trailing fence is left in place.
pub fn strip_code_blocks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find(FENCE) {
        let after_open = open + FENCE.len();
        match rest[after_open..].find(FENCE) {
            Some(close_rel) => {
                out.push_str(&rest[..open]);
                rest = &rest[after_open + close_rel + FENCE.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[derive(Deserialize)]
struct AuditWire {
    score: Option<f64>,
    report: Option<String>,
}

/// Parsed audit payload. Score already clamped to 0..=100.
#[derive(Debug, PartialEq, Eq)]
pub struct AuditPayload {
    pub score: u8,
    pub report: String,
}

/// Parse the JSON an audit request asked the model for.
///
/// Strict on syntax: malformed JSON is a `ParseFailure`, never a silent
/// zero-score report, so callers can tell "could not audit" from "audit
/// scored zero". Lenient on fields: a missing score reads as 0 and a missing
/// or empty report gets [`NO_REPORT`].
pub fn parse_audit(raw: &str) -> Result<AuditPayload, EngineError> {
    let wire: AuditWire = serde_json::from_str(raw)
        .map_err(|e| EngineError::ParseFailure(format!("audit payload: {e}")))?;

    Ok(AuditPayload {
        score: clamp_score(wire.score.unwrap_or(0.0)),
        report: wire
            .report
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_REPORT.to_string()),
    })
}

/// Clamp a raw score to 0..=100; non-finite values (NaN, Inf) collapse to 0.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Append a Markdown sources section listing each grounding citation as a
/// link, in the order the service supplied them. No sources, no change.
pub fn append_sources(text: &str, sources: &[SourceRef]) -> String {
    if sources.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 64 * sources.len());
    out.push_str(text);
    out.push_str("\n\n### 🌐 Verified Sources\n");
    for source in sources {
        out.push_str(&format!("- [{}]({})\n", source.title, source.uri));
    }
    out
}
