use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::EngineError;
use crate::gateway::{GenerateRequest, ModelGateway, ModelResponse, SourceRef};

const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024; // 2MB

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiGateway {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(4)
            .build()
            .expect("failed to build HTTP client");

        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Self {
            client,
            api_key: config.api_key.clone(),
            url,
        }
    }

    fn build_body(req: &GenerateRequest) -> serde_json::Value {
        let mut generation_config = serde_json::Map::new();
        if let Some(t) = req.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(t));
        }
        if req.json_output {
            generation_config.insert(
                "responseMimeType".to_string(),
                serde_json::json!("application/json"),
            );
            // The service rejects a response schema combined with tools, so the
            // schema rides along only when search is off. JSON mode alone still
            // applies in the search case.
            if !req.web_search {
                generation_config.insert(
                    "responseSchema".to_string(),
                    serde_json::json!({
                        "type": "OBJECT",
                        "properties": {
                            "score": { "type": "NUMBER" },
                            "report": { "type": "STRING" }
                        },
                        "required": ["score", "report"]
                    }),
                );
            }
        }

        let mut body = serde_json::json!({
            "contents": [{"parts": [{"text": req.prompt}]}]
        });
        if !generation_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation_config);
        }
        if req.web_search {
            body["tools"] = serde_json::json!([{"google_search": {}}]);
        }
        body
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, req: &GenerateRequest) -> Result<ModelResponse, EngineError> {
        // Credential gate: fail before any network I/O.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EngineError::MissingCredential)?;

        let body = Self::build_body(req);

        tracing::debug!(
            url = %self.url,
            web_search = req.web_search,
            json_output = req.json_output,
            "dispatching generateContent"
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EngineError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(EngineError::AuthFailed {
                message: format!("{status}"),
            });
        }

        // Catch-all for any non-success status (4xx, 5xx, 3xx that wasn't followed)
        // Cap error body reads to MAX_RESPONSE_BYTES to prevent memory exhaustion
        if !status.is_success() {
            let error_bytes = response.bytes().await.unwrap_or_default();
            let truncated = &error_bytes[..error_bytes.len().min(MAX_RESPONSE_BYTES)];
            let text = String::from_utf8_lossy(truncated);
            return Err(EngineError::Upstream {
                message: format!("{status}: {text}"),
                status: Some(status.as_u16()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| EngineError::Upstream {
            message: format!("failed to read response body: {e}"),
            status: None,
        })?;

        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(EngineError::Upstream {
                message: format!(
                    "response too large: {} bytes (max {})",
                    bytes.len(),
                    MAX_RESPONSE_BYTES
                ),
                status: None,
            });
        }

        parse_reply(&bytes)
    }
}

// --- wire shapes -----------------------------------------------------------

#[derive(Deserialize)]
struct GenerateReply {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// Parse a raw `generateContent` reply body into text plus grounding sources.
///
/// Missing candidates or parts yield empty text (the engines substitute their
/// feature-specific fallbacks); malformed JSON is a `ParseFailure`. Grounding
/// chunks without both a web title and URI are dropped.
pub fn parse_reply(bytes: &[u8]) -> Result<ModelResponse, EngineError> {
    let reply: GenerateReply = serde_json::from_slice(bytes)
        .map_err(|e| EngineError::ParseFailure(format!("generateContent reply: {e}")))?;

    let candidate = reply.candidates.and_then(|mut c| {
        if c.is_empty() {
            None
        } else {
            Some(c.swap_remove(0))
        }
    });

    let Some(candidate) = candidate else {
        return Ok(ModelResponse {
            text: String::new(),
            sources: Vec::new(),
        });
    };

    let text = candidate
        .content
        .and_then(|c| c.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .and_then(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| {
            let web = chunk.web?;
            match (web.title, web.uri) {
                (Some(title), Some(uri)) => Some(SourceRef { title, uri }),
                _ => None,
            }
        })
        .collect();

    Ok(ModelResponse { text, sources })
}
