use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, HybridError};
use crate::types::Chapter;

/// A translation attached to a verse by the verses endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiTranslation {
    pub resource_id: u32,
    pub text: String,
}

/// Verse record as returned by the API, with the Arabic field resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ApiVerse {
    pub verse_number: u32,
    pub arabic_text: String,
    pub translations: Vec<ApiTranslation>,
}

/// One page of the verses endpoint
#[derive(Debug, Clone)]
pub struct VersesPage {
    pub verses: Vec<ApiVerse>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChaptersEnvelope {
    chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
struct ChapterEnvelope {
    chapter: Chapter,
}

#[derive(Debug, Deserialize)]
struct VersesEnvelope {
    verses: Vec<RawVerse>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct RawVerse {
    verse_number: u32,
    translations: Vec<ApiTranslation>,
    /// Requested text fields (text_uthmani, text_imlaei, ...) land here
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    next_page: Option<u32>,
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| HybridError::Schema {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}

/// Parse the chapter listing body
pub fn parse_chapters(endpoint: &str, body: &str) -> Result<Vec<Chapter>> {
    decode::<ChaptersEnvelope>(endpoint, body).map(|envelope| envelope.chapters)
}

/// Parse a single chapter metadata body
pub fn parse_chapter(endpoint: &str, body: &str) -> Result<Chapter> {
    decode::<ChapterEnvelope>(endpoint, body).map(|envelope| envelope.chapter)
}

/// Parse one verses page, reading the Arabic text from `text_field`
pub fn parse_verses_page(endpoint: &str, body: &str, text_field: &str) -> Result<VersesPage> {
    let envelope: VersesEnvelope = decode(endpoint, body)?;

    let verses = envelope.verses
        .into_iter()
        .map(|raw| {
            let arabic_text = raw.fields
                .get(text_field)
                .and_then(|value| value.as_str())
                .ok_or_else(|| HybridError::Schema {
                    endpoint: endpoint.to_string(),
                    detail: format!("verse {} has no string field '{}'", raw.verse_number, text_field),
                })?
                .to_string();

            Ok(ApiVerse {
                verse_number: raw.verse_number,
                arabic_text,
                translations: raw.translations,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VersesPage {
        verses,
        next_page: envelope.pagination.and_then(|p| p.next_page),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSES_BODY: &str = r#"{
        "verses": [
            {
                "id": 1,
                "verse_number": 1,
                "verse_key": "1:1",
                "text_uthmani": "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ",
                "translations": [
                    {"id": 1, "resource_id": 52, "text": "Rahman ve Rahim olan Allah'ın adıyla."}
                ]
            }
        ],
        "pagination": {"per_page": 50, "current_page": 1, "next_page": null, "total_pages": 1, "total_records": 7}
    }"#;

    #[test]
    fn test_parse_chapters() {
        let body = r#"{"chapters": [
            {"id": 1, "name_simple": "Al-Fatihah", "verses_count": 7},
            {"id": 2, "name_simple": "Al-Baqarah", "verses_count": 286}
        ]}"#;
        let chapters = parse_chapters("/chapters", body).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].name_simple, "Al-Baqarah");
    }

    #[test]
    fn test_parse_chapters_missing_key_is_schema_error() {
        let err = parse_chapters("/chapters", r#"{"surahs": []}"#).unwrap_err();
        match err {
            HybridError::Schema { endpoint, detail } => {
                assert_eq!(endpoint, "/chapters");
                assert!(detail.contains("chapters"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_chapter() {
        let body = r#"{"chapter": {"id": 112, "name_simple": "Al-Ikhlas", "name_arabic": "الإخلاص"}}"#;
        let chapter = parse_chapter("/chapters/112", body).unwrap();
        assert_eq!(chapter.id, 112);
        assert_eq!(chapter.name_arabic, "الإخلاص");
    }

    #[test]
    fn test_parse_verses_page() {
        let page = parse_verses_page("/verses", VERSES_BODY, "text_uthmani").unwrap();
        assert_eq!(page.verses.len(), 1);
        assert_eq!(page.verses[0].verse_number, 1);
        assert_eq!(page.verses[0].translations[0].resource_id, 52);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_parse_verses_page_reports_next_page() {
        let body = r#"{"verses": [], "pagination": {"next_page": 2}}"#;
        let page = parse_verses_page("/verses", body, "text_uthmani").unwrap();
        assert_eq!(page.next_page, Some(2));
    }

    #[test]
    fn test_parse_verses_page_without_pagination() {
        let body = r#"{"verses": []}"#;
        let page = parse_verses_page("/verses", body, "text_uthmani").unwrap();
        assert!(page.verses.is_empty());
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_parse_verses_page_missing_text_field() {
        let err = parse_verses_page("/verses", VERSES_BODY, "text_imlaei").unwrap_err();
        assert!(err.to_string().contains("text_imlaei"));
    }

    #[test]
    fn test_parse_verses_page_missing_translations() {
        let body = r#"{"verses": [{"verse_number": 1, "text_uthmani": "x"}]}"#;
        assert!(matches!(
            parse_verses_page("/verses", body, "text_uthmani"),
            Err(HybridError::Schema { .. })
        ));
    }

    #[test]
    fn test_parse_verses_page_rejects_non_json() {
        assert!(parse_verses_page("/verses", "<html>502</html>", "text_uthmani").is_err());
    }
}
