use chrono::Utc;
use tracing::{debug, info, warn};

use crate::assemble::assemble_verses;
use crate::config::Config;
use crate::content::{ContentSource, ContentSourceFactory};
use crate::error::Result;
use crate::synthesis::{synthesize_batch, Synthesizer, SynthesizerFactory};
use crate::types::{AssembledVerse, SynthesisResult, Verse, GENERATION_FAILED, SYNTHESIS_UNAVAILABLE};
use crate::view::{ChapterListView, ChapterView};

/// Fetch → assemble → synthesize → merge, one chapter per call
pub struct Workflow {
    config: Config,
    content: Box<dyn ContentSource>,
    synthesizer: Box<dyn Synthesizer>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let content = ContentSourceFactory::create_source(config.content.clone())?;
        let synthesizer = SynthesizerFactory::create_synthesizer(config.synthesis.clone())?;

        Ok(Self::with_parts(config, content, synthesizer))
    }

    pub fn with_parts(
        config: Config,
        content: Box<dyn ContentSource>,
        synthesizer: Box<dyn Synthesizer>,
    ) -> Self {
        Self {
            config,
            content,
            synthesizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn synthesizer(&self) -> &dyn Synthesizer {
        self.synthesizer.as_ref()
    }

    /// Chapter listing for the index page
    pub async fn chapter_list(&self) -> ChapterListView {
        match self.content.list_chapters().await {
            Ok(chapters) => ChapterListView::loaded(chapters),
            Err(e) => {
                warn!("Failed to list chapters: {}", e);
                ChapterListView::failed(format!("Network error while fetching the chapter list: {}", e))
            }
        }
    }

    /// Full chapter view; synthesis failures never abort it
    pub async fn chapter(&self, chapter_number: u32) -> ChapterView {
        info!("Building chapter {}", chapter_number);
        let model = &self.config.synthesis.model;

        let bundle = match self.content
            .fetch_chapter_verses(chapter_number, &self.config.content.translation_ids)
            .await
        {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Failed to fetch chapter {}: {}", chapter_number, e);
                return ChapterView::failed(format!("An error occurred while fetching data: {}", e), model);
            }
        };

        let (verses, items) = assemble_verses(
            bundle.chapter.id,
            &bundle.verses,
            &self.config.content.translation_ids,
        );
        info!("Assembled {} verses of {}", verses.len(), bundle.chapter.name_simple);

        let outcome = if items.is_empty() {
            Ok(SynthesisResult::new())
        } else {
            synthesize_batch(
                self.synthesizer.as_ref(),
                &items,
                &self.config.synthesis.target_language,
            )
            .await
        };

        let synthesis_error = match &outcome {
            Ok(_) => None,
            Err(e) => {
                warn!("Hybrid translation unavailable for chapter {}: {}", chapter_number, e);
                Some(e.to_string())
            }
        };

        ChapterView {
            chapter: Some(bundle.chapter),
            verses: merge_synthesis(verses, outcome.ok().as_ref()),
            error: None,
            synthesis_error,
            model: model.clone(),
            generated_at: Utc::now(),
        }
    }
}

/// Attach hybrid text to each verse.
///
/// `None` means the whole batch failed and every verse gets
/// [`SYNTHESIS_UNAVAILABLE`]; otherwise verses the reply skipped get
/// [`GENERATION_FAILED`]. Reply entries for other verse numbers are ignored.
pub fn merge_synthesis(verses: Vec<Verse>, result: Option<&SynthesisResult>) -> Vec<AssembledVerse> {
    if let Some(result) = result {
        let extra: Vec<u32> = result
            .keys()
            .copied()
            .filter(|n| !verses.iter().any(|v| v.verse_number == *n))
            .collect();
        if !extra.is_empty() {
            debug!("Ignoring hybrid translations for verses outside the batch: {:?}", extra);
        }
    }

    verses
        .into_iter()
        .map(|verse| {
            let hybrid = match result {
                Some(result) => result
                    .get(&verse.verse_number)
                    .cloned()
                    .unwrap_or_else(|| GENERATION_FAILED.to_string()),
                None => SYNTHESIS_UNAVAILABLE.to_string(),
            };

            AssembledVerse {
                verse_number: verse.verse_number,
                arabic_text: verse.arabic_text,
                translations: verse.translations,
                hybrid,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ApiTranslation, ApiVerse, ChapterBundle, MockContentSource};
    use crate::error::HybridError;
    use crate::synthesis::MockSynthesizer;
    use crate::types::{Chapter, TRANSLATION_UNAVAILABLE};

    fn chapter(id: u32, verses_count: u32) -> Chapter {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name_simple": "Al-Ikhlas",
            "verses_count": verses_count,
        }))
        .unwrap()
    }

    fn api_verse(number: u32) -> ApiVerse {
        ApiVerse {
            verse_number: number,
            arabic_text: format!("ayah {}", number),
            translations: vec![ApiTranslation { resource_id: 52, text: format!("t{}", number) }],
        }
    }

    fn bundle(numbers: &[u32]) -> ChapterBundle {
        ChapterBundle {
            chapter: chapter(112, numbers.len() as u32),
            verses: numbers.iter().copied().map(api_verse).collect(),
        }
    }

    fn content_returning(numbers: &'static [u32]) -> MockContentSource {
        let mut content = MockContentSource::new();
        content.expect_fetch_chapter_verses()
            .returning(move |_, _| Ok(bundle(numbers)));
        content
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.content.translation_ids = vec![52, 112];
        config
    }

    #[tokio::test]
    async fn test_chapter_with_full_synthesis() {
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().times(1).returning(|_| {
            Ok(r#"[{"verse_number":1,"hybrid_translation":"h1"},{"verse_number":2,"hybrid_translation":"h2"}]"#.to_string())
        });

        let workflow = Workflow::with_parts(config(), Box::new(content_returning(&[2, 1])), Box::new(synth));
        let view = workflow.chapter(112).await;

        assert!(view.is_ok());
        assert!(view.synthesis_error.is_none());
        assert_eq!(view.chapter.as_ref().map(|c| c.id), Some(112));
        let hybrids: Vec<&str> = view.verses.iter().map(|v| v.hybrid.as_str()).collect();
        assert_eq!(hybrids, vec!["h1", "h2"]);
        assert_eq!(view.verses[0].translations, vec!["t1", TRANSLATION_UNAVAILABLE]);
    }

    #[tokio::test]
    async fn test_partial_reply_marks_only_missing_verse() {
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().returning(|_| {
            Ok(r#"Here: [{"verse_number":1,"hybrid_translation":"h1"},{"verse_number":2,"hybrid_translation":"h2"}]"#.to_string())
        });

        let workflow = Workflow::with_parts(config(), Box::new(content_returning(&[1, 2, 3])), Box::new(synth));
        let view = workflow.chapter(112).await;

        let hybrids: Vec<&str> = view.verses.iter().map(|v| v.hybrid.as_str()).collect();
        assert_eq!(hybrids, vec!["h1", "h2", GENERATION_FAILED]);
        assert!(view.synthesis_error.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_model_keeps_fetched_content() {
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().returning(|_| {
            Err(HybridError::ProcessUnavailable {
                binary: "ollama".to_string(),
                reason: "No such file or directory".to_string(),
            })
        });

        let workflow = Workflow::with_parts(config(), Box::new(content_returning(&[1, 2, 3, 4])), Box::new(synth));
        let view = workflow.chapter(112).await;

        assert!(view.is_ok());
        assert_eq!(view.verses.len(), 4);
        assert!(view.verses.iter().all(|v| v.hybrid == SYNTHESIS_UNAVAILABLE));
        assert!(view.verses.iter().all(|v| !v.arabic_text.is_empty() && v.translations.len() == 2));
        assert!(view.synthesis_error.as_deref().unwrap_or_default().contains("ollama"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_uses_batch_placeholder() {
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().returning(|_| Ok("I am unable to do that.".to_string()));

        let workflow = Workflow::with_parts(config(), Box::new(content_returning(&[1])), Box::new(synth));
        let view = workflow.chapter(112).await;

        assert_eq!(view.verses[0].hybrid, SYNTHESIS_UNAVAILABLE);
        assert!(view.synthesis_error.is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error_and_skips_synthesis() {
        let mut content = MockContentSource::new();
        content.expect_fetch_chapter_verses()
            .returning(|n, _| Err(HybridError::InvalidChapter(n)));
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().times(0);

        let workflow = Workflow::with_parts(config(), Box::new(content), Box::new(synth));
        let view = workflow.chapter(200).await;

        assert!(!view.is_ok());
        assert!(view.chapter.is_none());
        assert!(view.verses.is_empty());
        assert!(view.error.unwrap().contains("200"));
    }

    #[tokio::test]
    async fn test_empty_chapter_skips_model_call() {
        let mut synth = MockSynthesizer::new();
        synth.expect_generate().times(0);

        let workflow = Workflow::with_parts(config(), Box::new(content_returning(&[])), Box::new(synth));
        let view = workflow.chapter(112).await;

        assert!(view.is_ok());
        assert!(view.verses.is_empty());
    }

    #[tokio::test]
    async fn test_configured_ids_are_requested() {
        let mut content = MockContentSource::new();
        content.expect_fetch_chapter_verses()
            .withf(|n: &u32, ids: &[u32]| *n == 112 && ids == [52, 112])
            .times(1)
            .returning(|_, _| Ok(bundle(&[1])));
        let mut synth = MockSynthesizer::new();
        synth.expect_generate()
            .returning(|_| Ok(r#"[{"verse_number":1,"hybrid_translation":"h"}]"#.to_string()));

        let workflow = Workflow::with_parts(config(), Box::new(content), Box::new(synth));
        assert!(workflow.chapter(112).await.is_ok());
    }

    #[tokio::test]
    async fn test_chapter_list_error_view() {
        let mut content = MockContentSource::new();
        content.expect_list_chapters().returning(|| {
            Err(HybridError::HttpStatus {
                url: "https://api.quran.com/api/v4/chapters".to_string(),
                status: 500,
                body: String::new(),
            })
        });

        let workflow = Workflow::with_parts(config(), Box::new(content), Box::new(MockSynthesizer::new()));
        let view = workflow.chapter_list().await;

        assert!(view.chapters.is_empty());
        assert!(!view.error.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_chapter_list_success_view() {
        let mut content = MockContentSource::new();
        content.expect_list_chapters().returning(|| Ok(vec![chapter(1, 7), chapter(2, 286)]));

        let workflow = Workflow::with_parts(config(), Box::new(content), Box::new(MockSynthesizer::new()));
        let view = workflow.chapter_list().await;

        assert!(view.error.is_none());
        assert_eq!(view.chapters.len(), 2);
    }

    #[test]
    fn test_merge_ignores_out_of_range_entries() {
        let verses = vec![Verse {
            chapter_number: 112,
            verse_number: 1,
            arabic_text: "a".to_string(),
            translations: vec!["t".to_string()],
        }];
        let mut result = SynthesisResult::new();
        result.insert(1, "h1".to_string());
        result.insert(99, "stray".to_string());

        let merged = merge_synthesis(verses, Some(&result));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].hybrid, "h1");
    }

    #[test]
    fn test_merge_without_result_uses_unavailable_placeholder() {
        let verses = (1..=3)
            .map(|n| Verse {
                chapter_number: 1,
                verse_number: n,
                arabic_text: String::new(),
                translations: Vec::new(),
            })
            .collect();

        let merged = merge_synthesis(verses, None);
        assert_eq!(merged.len(), 3);
        assert!(merged.iter().all(|v| v.hybrid == SYNTHESIS_UNAVAILABLE));
    }
}
