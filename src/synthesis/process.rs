use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::SynthesisConfig;
use crate::error::{Result, HybridError};
use super::Synthesizer;

/// Runs `<binary> run <model>` with the prompt on stdin
pub struct OllamaProcessSynthesizer {
    config: SynthesisConfig,
}

impl OllamaProcessSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Synthesizer for OllamaProcessSynthesizer {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!("Sending {} byte prompt to {} run {} (timeout {}s)",
              prompt.len(), self.config.binary_path, self.config.model, self.config.timeout_secs);
        let started = Instant::now();

        let mut child = Command::new(&self.config.binary_path)
            .arg("run")
            .arg(&self.config.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HybridError::ProcessUnavailable {
                binary: self.config.binary_path.clone(),
                reason: e.to_string(),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| HybridError::ProcessUnavailable {
            binary: self.config.binary_path.clone(),
            reason: "stdin was not captured".to_string(),
        })?;

        // Feed stdin from its own task so a large prompt cannot deadlock
        // against a child that is already filling its stdout pipe.
        let payload = prompt.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&payload).await;
            drop(stdin);
            result
        });

        let output = match tokio::time::timeout(self.config.timeout(), child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                writer.abort();
                warn!("{} run {} exceeded {}s, killed",
                      self.config.binary_path, self.config.model, self.config.timeout_secs);
                return Err(HybridError::ProcessTimeout(self.config.timeout_secs));
            }
        };

        match writer.await {
            Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => warn!("Failed to write prompt: {}", e),
            Err(e) => warn!("Prompt writer task failed: {}", e),
            _ => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(HybridError::ProcessFailure {
                status: output.status.to_string(),
                stderr,
            });
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Model answered in {:.2}s", started.elapsed().as_secs_f64());
        debug!("Raw model reply: {}", reply);
        Ok(reply)
    }
}
