use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::content::ApiVerse;
use crate::sanitize::clean_footnotes;
use crate::types::{SynthesisItem, Verse, TRANSLATION_UNAVAILABLE};

/// Build verses with translations in `translation_ids` order, plus the
/// matching synthesis batch.
///
/// Output is ascending by verse number; a verse number seen twice keeps its
/// first record. Ids missing from a verse get [`TRANSLATION_UNAVAILABLE`].
pub fn assemble_verses(
    chapter_number: u32,
    records: &[ApiVerse],
    translation_ids: &[u32],
) -> (Vec<Verse>, Vec<SynthesisItem>) {
    let mut by_number: BTreeMap<u32, Verse> = BTreeMap::new();

    for record in records {
        if by_number.contains_key(&record.verse_number) {
            debug!("Skipping duplicate record for verse {}:{}", chapter_number, record.verse_number);
            continue;
        }

        let texts: HashMap<u32, &str> = record.translations
            .iter()
            .map(|t| (t.resource_id, t.text.as_str()))
            .collect();

        let translations = translation_ids
            .iter()
            .map(|id| clean_footnotes(texts.get(id).copied().unwrap_or(TRANSLATION_UNAVAILABLE)))
            .collect();

        by_number.insert(record.verse_number, Verse {
            chapter_number,
            verse_number: record.verse_number,
            arabic_text: record.arabic_text.clone(),
            translations,
        });
    }

    let verses: Vec<Verse> = by_number.into_values().collect();
    let items = verses.iter().map(SynthesisItem::from).collect();
    (verses, items)
}
