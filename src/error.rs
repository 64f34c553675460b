use thiserror::Error;

#[derive(Error, Debug)]
pub enum HybridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response shape from {endpoint}: {detail}")]
    Schema { endpoint: String, detail: String },

    #[error("Failed to fetch chapter {chapter}: {source}")]
    ChapterFetch {
        chapter: u32,
        #[source]
        source: Box<HybridError>,
    },

    #[error("Invalid chapter number {0}: must be between 1 and 114")]
    InvalidChapter(u32),

    #[error("Language model runner '{binary}' could not be started: {reason}")]
    ProcessUnavailable { binary: String, reason: String },

    #[error("Language model did not answer within {0} seconds")]
    ProcessTimeout(u64),

    #[error("Language model exited with {status}: {stderr}")]
    ProcessFailure { status: String, stderr: String },

    #[error("Could not parse language model reply: {0}")]
    SynthesisParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HybridError>;
