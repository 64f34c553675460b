use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{AssembledVerse, Chapter};

/// What a page listing all chapters needs
#[derive(Debug, Clone, Serialize)]
pub struct ChapterListView {
    pub chapters: Vec<Chapter>,
    /// Set when the listing could not be fetched; `chapters` is then empty
    pub error: Option<String>,
}

/// What a single chapter page needs
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub chapter: Option<Chapter>,
    pub verses: Vec<AssembledVerse>,
    /// Fetch-stage failure; nothing else is rendered when set
    pub error: Option<String>,
    /// Why hybrid translations are placeholders, if they are
    pub synthesis_error: Option<String>,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl ChapterListView {
    pub fn loaded(chapters: Vec<Chapter>) -> Self {
        Self { chapters, error: None }
    }

    pub fn failed(error: String) -> Self {
        Self { chapters: Vec::new(), error: Some(error) }
    }
}

impl ChapterView {
    pub fn failed(error: String, model: &str) -> Self {
        Self {
            chapter: None,
            verses: Vec::new(),
            error: Some(error),
            synthesis_error: None,
            model: model.to_string(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
