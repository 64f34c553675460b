// Content retrieval from the quran.com API
//
// - Api: response envelopes and schema checks
// - Client: reqwest-based fetcher with per-call timeouts and paging

pub mod api;
pub mod client;

use async_trait::async_trait;

pub use api::{ApiTranslation, ApiVerse};
pub use client::QuranApiClient;

use crate::config::ContentConfig;
use crate::error::Result;
use crate::types::Chapter;

/// Highest chapter number in the mushaf
pub const LAST_CHAPTER: u32 = 114;

/// Chapter metadata together with its raw verse records
#[derive(Debug, Clone)]
pub struct ChapterBundle {
    pub chapter: Chapter,
    pub verses: Vec<ApiVerse>,
}

/// Source of chapter and verse content
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List every chapter in order
    async fn list_chapters(&self) -> Result<Vec<Chapter>>;

    /// Fetch chapter metadata and all of its verses with the given translations
    async fn fetch_chapter_verses(
        &self,
        chapter_number: u32,
        translation_ids: &[u32],
    ) -> Result<ChapterBundle>;
}

/// Factory for creating content sources
pub struct ContentSourceFactory;

impl ContentSourceFactory {
    /// Create the default HTTP-backed content source
    pub fn create_source(config: ContentConfig) -> Result<Box<dyn ContentSource>> {
        Ok(Box::new(QuranApiClient::new(config)?))
    }
}
