use sitesmith::error::EngineError;
use sitesmith::gateway::SourceRef;
use sitesmith::gateway::gemini::parse_reply;
use sitesmith::prompt;
use sitesmith::shape::{
    AuditPayload, NO_REPORT, append_sources, clamp_score, extract_code, parse_audit,
    strip_code_blocks,
};

// ---------------------------------------------------------------------------
// code extraction
// ---------------------------------------------------------------------------

#[test]
fn extract_code_returns_inner_content_of_first_fence() {
    let raw = "Here is the rewrite:\n```tsx\nconst App = () => <div />;\n```\nEnjoy.";
    assert_eq!(extract_code(raw), "const App = () => <div />;");
}

#[test]
fn extract_code_trims_inner_whitespace() {
    let raw = "```\n\n  let x = 1;\n\n```";
    assert_eq!(extract_code(raw), "let x = 1;");
}

#[test]
fn extract_code_without_fence_returns_input_verbatim() {
    let raw = "const x = 1; // no fences here";
    assert_eq!(extract_code(raw), raw);
}

#[test]
fn extract_code_ignores_unclosed_fence() {
    let raw = "```tsx\nconst x = 1;";
    assert_eq!(extract_code(raw), raw);
}

#[test]
fn extract_code_takes_first_of_multiple_blocks() {
    let raw = "```js\nfirst\n```\ntext\n```js\nsecond\n```";
    assert_eq!(extract_code(raw), "first");
}

#[test]
fn strip_code_blocks_removes_fenced_block_and_trims() {
    let raw = "Before.\n```tsx\nconst App = () => <div />;\n```\nAfter.";
    assert_eq!(strip_code_blocks(raw), "Before.\n\nAfter.");
}

#[test]
fn strip_code_blocks_removes_every_block() {
    let raw = "a\n```\none\n```\nb\n```\ntwo\n```\nc";
    let stripped = strip_code_blocks(raw);
    assert!(!stripped.contains("one"));
    assert!(!stripped.contains("two"));
    assert!(stripped.contains('a') && stripped.contains('b') && stripped.contains('c'));
}

#[test]
fn strip_code_blocks_yields_empty_for_code_only_response() {
    let raw = "```tsx\nconst App = () => <div />;\n```";
    assert_eq!(strip_code_blocks(raw), "");
}

// ---------------------------------------------------------------------------
// audit payload parsing
// ---------------------------------------------------------------------------

#[test]
fn parse_audit_reads_well_formed_payload_exactly() {
    let payload = parse_audit(r#"{"score": 73, "report": "X"}"#).unwrap();
    assert_eq!(
        payload,
        AuditPayload {
            score: 73,
            report: "X".to_string()
        }
    );
}

#[test]
fn parse_audit_rejects_malformed_json_as_parse_failure() {
    let err = parse_audit(r#"{"score": 5"#).unwrap_err();
    assert!(matches!(err, EngineError::ParseFailure(_)));
    assert!(!err.is_retryable());
}

#[test]
fn parse_audit_defaults_missing_fields() {
    let payload = parse_audit("{}").unwrap();
    assert_eq!(payload.score, 0);
    assert_eq!(payload.report, NO_REPORT);
}

#[test]
fn parse_audit_substitutes_empty_report() {
    let payload = parse_audit(r#"{"score": 40, "report": ""}"#).unwrap();
    assert_eq!(payload.report, NO_REPORT);
}

#[test]
fn parse_audit_clamps_out_of_range_scores() {
    assert_eq!(parse_audit(r#"{"score": 150, "report": "r"}"#).unwrap().score, 100);
    assert_eq!(parse_audit(r#"{"score": -3, "report": "r"}"#).unwrap().score, 0);
}

#[test]
fn clamp_score_handles_fractions_and_non_finite() {
    assert_eq!(clamp_score(72.6), 73);
    assert_eq!(clamp_score(f64::NAN), 0);
    assert_eq!(clamp_score(f64::INFINITY), 0);
}

// ---------------------------------------------------------------------------
// source appending
// ---------------------------------------------------------------------------

fn two_sources() -> Vec<SourceRef> {
    vec![
        SourceRef {
            title: "A".to_string(),
            uri: "http://a".to_string(),
        },
        SourceRef {
            title: "B".to_string(),
            uri: "http://b".to_string(),
        },
    ]
}

#[test]
fn append_sources_lists_links_in_supplied_order() {
    let out = append_sources("Report body.", &two_sources());
    assert!(out.starts_with("Report body."));
    assert!(out.contains("### 🌐 Verified Sources"));
    let a = out.find("- [A](http://a)").expect("first link missing");
    let b = out.find("- [B](http://b)").expect("second link missing");
    assert!(a < b, "sources were re-ordered");
}

#[test]
fn append_sources_with_empty_list_returns_text_unchanged() {
    assert_eq!(append_sources("unchanged", &[]), "unchanged");
}

// ---------------------------------------------------------------------------
// prompt builders: search is URL-triggered only
// ---------------------------------------------------------------------------

#[test]
fn url_mode_always_enables_search() {
    assert!(prompt::modernize("http://x", prompt::AUTO_DETECT, true).web_search);
    assert!(prompt::audit("http://x", true).web_search);
    assert!(prompt::design("vision", Some("http://x"), false).web_search);
    assert!(prompt::growth("http://x", true).web_search);
}

#[test]
fn text_mode_never_enables_search() {
    assert!(!prompt::modernize("<table>", "HTML4", false).web_search);
    assert!(!prompt::audit("code", false).web_search);
    assert!(!prompt::design("vision", None, false).web_search);
    assert!(!prompt::growth("a bakery", false).web_search);
}

#[test]
fn modernize_prompt_embeds_language_hint() {
    let spec = prompt::modernize("code", "PHP", false);
    assert!(spec.text.contains("The source language is PHP."));

    let auto = prompt::modernize("code", prompt::AUTO_DETECT, false);
    assert!(auto.text.contains("automatically detect the source language"));
}

#[test]
fn audit_prompt_demands_score_and_report() {
    for is_url in [true, false] {
        let spec = prompt::audit("target", is_url);
        assert!(spec.text.contains("\"score\""));
        assert!(spec.text.contains("\"report\""));
    }
}

#[test]
fn design_prompt_role_follows_code_flag() {
    let code = prompt::design("vision", Some("http://x"), true);
    assert!(code.text.contains("Frontend Architect"));
    assert!(code.text.contains("ONLY the code"));

    let advice = prompt::design("vision", Some("http://x"), false);
    assert!(advice.text.contains("UI/UX Designer"));
    assert!(advice.text.contains("Format as Markdown"));
}

// ---------------------------------------------------------------------------
// generateContent wire parsing
// ---------------------------------------------------------------------------

#[test]
fn parse_reply_joins_parts_and_collects_sources() {
    let body = serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
            "groundingMetadata": {
                "groundingChunks": [
                    {"web": {"uri": "http://a", "title": "A"}},
                    {"web": {"uri": "http://b"}},
                    {"retrievedContext": {"uri": "ignored"}},
                    {"web": {"uri": "http://c", "title": "C"}}
                ]
            }
        }]
    });

    let reply = parse_reply(body.to_string().as_bytes()).unwrap();
    assert_eq!(reply.text, "Hello world");
    // Chunks missing a web title+uri pair are dropped; order is preserved.
    assert_eq!(
        reply.sources,
        vec![
            SourceRef {
                title: "A".to_string(),
                uri: "http://a".to_string()
            },
            SourceRef {
                title: "C".to_string(),
                uri: "http://c".to_string()
            },
        ]
    );
}

#[test]
fn parse_reply_with_no_candidates_yields_empty_text() {
    let reply = parse_reply(b"{}").unwrap();
    assert_eq!(reply.text, "");
    assert!(reply.sources.is_empty());

    let reply = parse_reply(br#"{"candidates": []}"#).unwrap();
    assert_eq!(reply.text, "");
}

#[test]
fn parse_reply_rejects_malformed_body() {
    let err = parse_reply(b"<html>502 Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, EngineError::ParseFailure(_)));
}
