use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shown in a translation slot when the API has no text for that resource id
pub const TRANSLATION_UNAVAILABLE: &str = "Unavailable";

/// Shown for a verse the model's reply did not cover
pub const GENERATION_FAILED: &str = "Generation failed";

/// Shown for every verse when the model could not be used at all
pub const SYNTHESIS_UNAVAILABLE: &str = "An error occurred while contacting the language model";

/// Chapter (surah) metadata as provided by the content API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub name_simple: String,
    #[serde(default)]
    pub name_complex: String,
    #[serde(default)]
    pub name_arabic: String,
    #[serde(default)]
    pub revelation_place: String,
    #[serde(default)]
    pub revelation_order: u32,
    #[serde(default)]
    pub verses_count: u32,
    #[serde(default)]
    pub bismillah_pre: bool,
    #[serde(default)]
    pub translated_name: Option<TranslatedName>,
    /// Any other fields the API sends, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedName {
    #[serde(default)]
    pub language_name: String,
    pub name: String,
}

/// A verse with its human translations in configured order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter_number: u32,
    pub verse_number: u32,
    pub arabic_text: String,
    /// One slot per configured translation id
    pub translations: Vec<String>,
}

/// One verse as it is sent to the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisItem {
    pub verse_number: u32,
    pub arabic_text: String,
    pub translations: Vec<String>,
}

/// Verse number to hybrid translation; may cover only part of a batch
pub type SynthesisResult = BTreeMap<u32, String>;

/// Final per-verse record handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledVerse {
    pub verse_number: u32,
    pub arabic_text: String,
    pub translations: Vec<String>,
    /// Hybrid translation, or a placeholder when synthesis failed
    pub hybrid: String,
}

impl Chapter {
    /// English gloss of the chapter name when the API provides one
    pub fn translated(&self) -> Option<&str> {
        self.translated_name.as_ref().map(|t| t.name.as_str())
    }
}

impl From<&Verse> for SynthesisItem {
    fn from(verse: &Verse) -> Self {
        Self {
            verse_number: verse.verse_number,
            arabic_text: verse.arabic_text.clone(),
            translations: verse.translations.clone(),
        }
    }
}
