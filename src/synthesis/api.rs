use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::error::{Result, HybridError};
use super::Synthesizer;

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Sends the prompt to the runner's `/api/generate` endpoint
pub struct OllamaApiSynthesizer {
    client: Client,
    config: SynthesisConfig,
}

impl OllamaApiSynthesizer {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HybridError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Synthesizer for OllamaApiSynthesizer {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.generate_url();
        info!("Sending {} byte prompt to {} (model {}, timeout {}s)",
              prompt.len(), url, self.config.model, self.config.timeout_secs);
        let started = Instant::now();

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HybridError::ProcessTimeout(self.config.timeout_secs)
                } else if e.is_connect() {
                    HybridError::ProcessUnavailable { binary: url.clone(), reason: e.to_string() }
                } else {
                    HybridError::Network { url: url.clone(), source: e }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HybridError::ProcessFailure {
                status: status.to_string(),
                stderr: body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HybridError::ProcessTimeout(self.config.timeout_secs)
            } else {
                HybridError::Network { url: url.clone(), source: e }
            }
        })?;

        let generated: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| HybridError::SynthesisParse(format!("unexpected generate response: {}", e)))?;

        let reply = generated.response.trim().to_string();
        info!("Model answered in {:.2}s", started.elapsed().as_secs_f64());
        debug!("Raw model reply: {}", reply);
        Ok(reply)
    }
}
