use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ContentConfig;
use crate::error::{Result, HybridError};
use crate::types::Chapter;
use super::{api, ApiVerse, ChapterBundle, ContentSource, LAST_CHAPTER};

/// Verse count of the longest chapter, used to bound paging
const LONGEST_CHAPTER_VERSES: u32 = 286;

/// Error bodies are cut to this many characters in messages
const BODY_EXCERPT_CHARS: usize = 200;

/// Pages fetched at most for one chapter; never below a full longest chapter
fn page_budget(verses_count: u32, per_page: u32) -> u32 {
    verses_count.max(LONGEST_CHAPTER_VERSES).div_ceil(per_page.max(1)) + 1
}

/// HTTP client for the quran.com v4 API
pub struct QuranApiClient {
    client: Client,
    config: ContentConfig,
}

impl QuranApiClient {
    pub fn new(config: ContentConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("quran-hybrid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HybridError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    pub fn chapters_url(&self) -> String {
        format!("{}/chapters", self.base_url())
    }

    pub fn chapter_url(&self, chapter_number: u32) -> String {
        format!("{}/chapters/{}", self.base_url(), chapter_number)
    }

    pub fn verses_url(&self, chapter_number: u32, translation_ids: &[u32], page: u32) -> String {
        let translations = translation_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}/verses/by_chapter/{}?language={}&words=false&translations={}&fields={}&per_page={}&page={}",
            self.base_url(),
            chapter_number,
            self.config.language,
            translations,
            self.config.verse_fields,
            self.config.per_page,
            page
        )
    }

    /// Field carrying the Arabic text, i.e. the first requested verse field
    fn text_field(&self) -> &str {
        self.config.verse_fields
            .split(',')
            .map(str::trim)
            .find(|field| !field.is_empty())
            .unwrap_or("text_uthmani")
    }

    /// GET a URL and return its body, treating non-2xx as an error
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!("GET {} (timeout {:?})", url, timeout);

        let response = self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| HybridError::Network { url: url.to_string(), source: e })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HybridError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        response.text().await
            .map_err(|e| HybridError::Network { url: url.to_string(), source: e })
    }

    async fn fetch_chapter(&self, chapter_number: u32) -> Result<Chapter> {
        let url = self.chapter_url(chapter_number);
        let body = self.get_text(&url, self.config.chapter_timeout()).await?;
        api::parse_chapter(&url, &body)
    }

    /// Follow the verses endpoint's pagination until the last page
    async fn fetch_all_verses(
        &self,
        chapter: &Chapter,
        translation_ids: &[u32],
    ) -> Result<Vec<ApiVerse>> {
        let budget = page_budget(chapter.verses_count, self.config.per_page);

        let mut verses = Vec::new();
        let mut page = 1;
        loop {
            let url = self.verses_url(chapter.id, translation_ids, page);
            let body = self.get_text(&url, self.config.verses_timeout()).await?;
            let parsed = api::parse_verses_page(&url, &body, self.text_field())?;

            debug!("Page {} of chapter {} returned {} verses", page, chapter.id, parsed.verses.len());
            verses.extend(parsed.verses);

            match parsed.next_page {
                Some(next) if next > page => {
                    if next > budget {
                        return Err(HybridError::Schema {
                            endpoint: url,
                            detail: format!("pagination exceeded {} pages", budget),
                        });
                    }
                    page = next;
                }
                _ => break,
            }
        }

        Ok(verses)
    }

    async fn fetch_bundle(&self, chapter_number: u32, translation_ids: &[u32]) -> Result<ChapterBundle> {
        let chapter = self.fetch_chapter(chapter_number).await?;
        let verses = self.fetch_all_verses(&chapter, translation_ids).await?;
        Ok(ChapterBundle { chapter, verses })
    }
}

#[async_trait]
impl ContentSource for QuranApiClient {
    async fn list_chapters(&self) -> Result<Vec<Chapter>> {
        let url = self.chapters_url();
        let body = self.get_text(&url, self.config.list_timeout()).await?;
        let chapters = api::parse_chapters(&url, &body)?;

        info!("Fetched {} chapters", chapters.len());
        Ok(chapters)
    }

    async fn fetch_chapter_verses(
        &self,
        chapter_number: u32,
        translation_ids: &[u32],
    ) -> Result<ChapterBundle> {
        if !(1..=LAST_CHAPTER).contains(&chapter_number) {
            return Err(HybridError::InvalidChapter(chapter_number));
        }

        let bundle = self.fetch_bundle(chapter_number, translation_ids)
            .await
            .map_err(|e| HybridError::ChapterFetch {
                chapter: chapter_number,
                source: Box::new(e),
            })?;

        info!("Fetched chapter {} ({}) with {} verses",
              chapter_number, bundle.chapter.name_simple, bundle.verses.len());
        Ok(bundle)
    }
}
