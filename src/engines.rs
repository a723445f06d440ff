//! The four feature entry points. Each call is independent: build a prompt,
//! run one gateway call, shape the result. The only cross-call state is the
//! in-flight guard, which cancels a stale request when the same engine is
//! invoked again before the first call resolves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::gateway::{GenerateRequest, ModelGateway, ModelResponse};
use crate::prompt;
use crate::shape;

/// Sampling temperature for code conversion. Low — we want faithful output,
/// not creative rewrites.
const MODERNIZE_TEMPERATURE: f64 = 0.2;

const NO_EXPLANATION: &str = "Conversion complete. See code above.";
const NO_DESIGN_OUTPUT: &str = "No output available.";
const NO_GROWTH_OUTPUT: &str = "No growth strategy available.";

/// Engine discriminator, used as the in-flight guard key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Engine {
    Modernize,
    Audit,
    Design,
    Growth,
}

/// Modernizer output: the converted code plus a prose explanation.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeSuggestion {
    pub code: String,
    pub explanation: String,
}

/// Auditor output: a Markdown report and a 0–100 health score.
#[derive(Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub markdown: String,
    pub score: u8,
}

/// Tagged result for the view layer.
#[derive(Debug, PartialEq, Eq)]
pub enum ShapedResult {
    Code(CodeSuggestion),
    Audit(AuditReport),
    Text { markdown: String },
}

pub struct Engines {
    gateway: Arc<dyn ModelGateway>,
    inflight: Mutex<HashMap<Engine, CancellationToken>>,
}

impl Engines {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new request for `engine`, cancelling any outstanding one.
    fn begin(&self, engine: Engine) -> CancellationToken {
        let token = CancellationToken::new();
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        if let Some(stale) = inflight.insert(engine, token.clone()) {
            tracing::debug!(?engine, "cancelling superseded in-flight request");
            stale.cancel();
        }
        token
    }

    /// Run one gateway call under the engine's cancellation token. A call
    /// superseded mid-flight resolves to `Cancelled` instead of racing the
    /// newer one to the caller.
    async fn run(
        &self,
        engine: Engine,
        req: GenerateRequest,
    ) -> Result<ModelResponse, EngineError> {
        let token = self.begin(engine);
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(EngineError::Cancelled),
            result = self.gateway.generate(&req) => result,
        }
    }

    /// Convert legacy code (or a live site, when `is_url`) to a modern stack.
    pub async fn modernize(
        &self,
        content: &str,
        source_lang: &str,
        is_url: bool,
    ) -> Result<CodeSuggestion, EngineError> {
        let spec = prompt::modernize(content, source_lang, is_url);
        let req = GenerateRequest {
            prompt: spec.text,
            temperature: Some(MODERNIZE_TEMPERATURE),
            json_output: false,
            web_search: spec.web_search,
        };
        let response = self.run(Engine::Modernize, req).await?;

        let code = shape::extract_code(&response.text);
        let mut explanation = shape::strip_code_blocks(&response.text);
        if is_url {
            explanation = shape::append_sources(&explanation, &response.sources);
        }
        if explanation.is_empty() {
            explanation = NO_EXPLANATION.to_string();
        }

        Ok(CodeSuggestion { code, explanation })
    }

    /// Security/performance audit. JSON mode: the model is asked for a
    /// `score`/`report` object; malformed JSON surfaces as `ParseFailure`.
    pub async fn audit(&self, content: &str, is_url: bool) -> Result<AuditReport, EngineError> {
        let spec = prompt::audit(content, is_url);
        let req = GenerateRequest {
            prompt: spec.text,
            temperature: None,
            json_output: true,
            web_search: spec.web_search,
        };
        let response = self.run(Engine::Audit, req).await?;

        let payload = shape::parse_audit(&response.text).inspect_err(|e| {
            tracing::warn!("audit response was not valid JSON: {e}");
        })?;

        let mut markdown = payload.report;
        if is_url {
            markdown = shape::append_sources(&markdown, &response.sources);
        }

        Ok(AuditReport {
            markdown,
            score: payload.score,
        })
    }

    /// UI/UX recommendations, or (with `wants_code`) a prototype component.
    /// Sources are only appended in recommendation mode; a code dump with a
    /// sources section tacked on is no longer a clean code block.
    pub async fn design_suggest(
        &self,
        instruction: &str,
        url: Option<&str>,
        wants_code: bool,
    ) -> Result<String, EngineError> {
        let spec = prompt::design(instruction, url, wants_code);
        let req = GenerateRequest::text(spec.text, spec.web_search);
        let response = self.run(Engine::Design, req).await?;

        let mut text = response.text;
        if text.is_empty() {
            text = NO_DESIGN_OUTPUT.to_string();
        }
        if url.is_some() && !wants_code {
            text = shape::append_sources(&text, &response.sources);
        }
        Ok(text)
    }

    /// Growth/SEO strategy as Markdown.
    pub async fn growth_suggest(
        &self,
        content: &str,
        is_url: bool,
    ) -> Result<String, EngineError> {
        let spec = prompt::growth(content, is_url);
        let req = GenerateRequest::text(spec.text, spec.web_search);
        let response = self.run(Engine::Growth, req).await?;

        let mut text = response.text;
        if text.is_empty() {
            text = NO_GROWTH_OUTPUT.to_string();
        }
        if is_url {
            text = shape::append_sources(&text, &response.sources);
        }
        Ok(text)
    }
}
