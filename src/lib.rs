//! sitesmith — service core of a website revamp studio.
//!
//! Four engines (code modernizer, security auditor, UI/UX designer, growth
//! strategist) build a prompt from user input, run one call against the
//! Gemini `generateContent` API, and shape the reply into typed results.

pub mod config;
pub mod engines;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod shape;

pub use engines::{AuditReport, CodeSuggestion, Engines, ShapedResult};
pub use error::EngineError;
