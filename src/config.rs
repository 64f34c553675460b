use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::error::{Result, HybridError};

/// Largest page size the verses endpoint accepts
pub const MAX_PER_PAGE: u32 = 50;

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_target_language() -> String {
    "Turkish".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub content: ContentConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Base URL of the content API (without trailing slash)
    pub base_url: String,
    /// Translation resource ids, in display order
    pub translation_ids: Vec<u32>,
    /// Language used for verse requests
    pub language: String,
    /// Extra verse fields to request (comma-separated)
    pub verse_fields: String,
    /// Verses per page for the paged verses endpoint
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Timeout for the chapter listing call (seconds)
    pub list_timeout_secs: u64,
    /// Timeout for the single chapter metadata call (seconds)
    pub chapter_timeout_secs: u64,
    /// Timeout for each verses page call (seconds)
    pub verses_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// How the language model is reached
    pub backend: SynthesisBackend,
    /// Path to the runner binary (e.g., ollama)
    pub binary_path: String,
    /// Model name passed to the runner
    pub model: String,
    /// Runner REST endpoint, used by the Api backend
    pub endpoint: String,
    /// Wall-clock budget for one chapter synthesis (seconds)
    pub timeout_secs: u64,
    /// Language the hybrid translation is written in
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthesisBackend {
    /// Cli: pipe the prompt into `<binary> run <model>`
    Cli,
    /// Api: POST the prompt to `<endpoint>/api/generate`
    Api,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig {
                base_url: "https://api.quran.com/api/v4".to_string(),
                translation_ids: vec![52, 112, 124, 210, 77],
                language: "ar".to_string(),
                verse_fields: "text_uthmani".to_string(),
                per_page: MAX_PER_PAGE,
                list_timeout_secs: 15,
                chapter_timeout_secs: 10,
                verses_timeout_secs: 30,
            },
            synthesis: SynthesisConfig {
                backend: SynthesisBackend::Cli,
                binary_path: "ollama".to_string(),
                model: "llama3".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                timeout_secs: 600,
                target_language: default_target_language(),
            },
        }
    }
}

impl ContentConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn chapter_timeout(&self) -> Duration {
        Duration::from_secs(self.chapter_timeout_secs)
    }

    pub fn verses_timeout(&self) -> Duration {
        Duration::from_secs(self.verses_timeout_secs)
    }
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HybridError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| HybridError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HybridError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| HybridError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.content.translation_ids.is_empty() {
            return Err(HybridError::Config("content.translation_ids must not be empty".to_string()));
        }
        if self.content.per_page == 0 || self.content.per_page > MAX_PER_PAGE {
            return Err(HybridError::Config(format!(
                "content.per_page must be between 1 and {}", MAX_PER_PAGE
            )));
        }
        if self.content.list_timeout_secs == 0
            || self.content.chapter_timeout_secs == 0
            || self.content.verses_timeout_secs == 0
        {
            return Err(HybridError::Config("content timeouts must be greater than zero".to_string()));
        }
        if self.synthesis.model.trim().is_empty() {
            return Err(HybridError::Config("synthesis.model must not be empty".to_string()));
        }
        if self.synthesis.timeout_secs == 0 {
            return Err(HybridError::Config("synthesis.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}
