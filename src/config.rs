use std::env;
use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Resolved configuration for the gateway. The credential is carried here and
/// injected into the gateway constructor; nothing reads the environment after
/// load time.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Optional `sitesmith.toml` overrides. The API key is env-only so it never
/// ends up committed in a config file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    model: Option<String>,
    base_url: Option<String>,
}

impl Config {
    /// Load from `sitesmith.toml` (if present in the CWD) plus the
    /// `GEMINI_API_KEY` environment variable.
    pub fn load() -> Self {
        Self::from_file_and_env(Path::new("sitesmith.toml"))
    }

    fn from_file_and_env(path: &Path) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("ignoring malformed {}: {e}", path.display());
                    FileConfig::default()
                }
            },
            Err(_) => FileConfig::default(),
        };

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set — every engine call will fail");
        }

        Config {
            api_key,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}
