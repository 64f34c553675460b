// Hybrid translation synthesis
//
// One language model call per chapter:
// - Prompt: preamble plus the batch as JSON
// - Process: `ollama run <model>` with the prompt on stdin (default)
// - Api: the same prompt over ollama's REST endpoint
// - Parser: lenient extraction of the JSON array from the reply

pub mod api;
pub mod parser;
pub mod process;
pub mod prompt;

use async_trait::async_trait;
use tracing::info;

pub use api::OllamaApiSynthesizer;
pub use parser::{extract_json_array, parse_reply};
pub use process::OllamaProcessSynthesizer;
pub use prompt::build_prompt;

use crate::config::{SynthesisBackend, SynthesisConfig};
use crate::error::Result;
use crate::types::{SynthesisItem, SynthesisResult};

/// Text generation backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Send a prompt and return the model's raw reply
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Factory for creating synthesizer instances
pub struct SynthesizerFactory;

impl SynthesizerFactory {
    /// Create a synthesizer based on the configured backend
    pub fn create_synthesizer(config: SynthesisConfig) -> Result<Box<dyn Synthesizer>> {
        match config.backend {
            SynthesisBackend::Cli => Ok(Box::new(OllamaProcessSynthesizer::new(config))),
            SynthesisBackend::Api => Ok(Box::new(OllamaApiSynthesizer::new(config)?)),
        }
    }
}

/// Synthesize hybrid translations for a whole chapter in one call
pub async fn synthesize_batch(
    synthesizer: &dyn Synthesizer,
    items: &[SynthesisItem],
    target_language: &str,
) -> Result<SynthesisResult> {
    let prompt = build_prompt(items, target_language)?;
    info!("Requesting hybrid translations for {} verses", items.len());

    let reply = synthesizer.generate(&prompt).await?;
    let result = parse_reply(&reply)?;

    info!("Model returned {} hybrid translations", result.len());
    Ok(result)
}

/// Al-Fatiha 1:1, used to check that the model runner answers
pub fn sample_batch() -> Vec<SynthesisItem> {
    vec![SynthesisItem {
        verse_number: 1,
        arabic_text: "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ".to_string(),
        translations: vec!["Rahman ve Rahim olan Allah'ın adıyla.".to_string()],
    }]
}

/// Send the sample batch and return the raw reply
pub async fn probe_synthesizer(synthesizer: &dyn Synthesizer, target_language: &str) -> Result<String> {
    let prompt = build_prompt(&sample_batch(), target_language)?;
    synthesizer.generate(&prompt).await
}
