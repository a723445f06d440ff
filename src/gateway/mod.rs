pub mod gemini;

use async_trait::async_trait;

use crate::error::EngineError;

/// One generation request to the remote model.
pub struct GenerateRequest {
    pub prompt: String,
    /// Sampling temperature (0 = deterministic, 1 = creative). None = service default.
    pub temperature: Option<f64>,
    /// Ask the model for a JSON object (`score`/`report` shape) instead of free text.
    pub json_output: bool,
    /// Enable the web-search augmentation tool so the model can "see" a URL.
    /// When enabled the response may carry grounding sources.
    pub web_search: bool,
}

impl GenerateRequest {
    pub fn text(prompt: String, web_search: bool) -> Self {
        Self {
            prompt,
            temperature: None,
            json_output: false,
            web_search,
        }
    }
}

/// A grounding citation the model attached after using web search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
}

/// What came back: the model's text plus any grounding sources, already
/// filtered to entries that carry both a title and a URI.
#[derive(Debug)]
pub struct ModelResponse {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

/// Seam between the engines and the remote model service. Object-safe so the
/// engines can run against a test double.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<ModelResponse, EngineError>;
}
