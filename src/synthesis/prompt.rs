use crate::error::Result;
use crate::types::SynthesisItem;

/// Build the single prompt for a whole chapter batch.
///
/// The batch is appended as pretty-printed JSON so the model sees the
/// exact `verse_number` keys it has to echo back.
pub fn build_prompt(items: &[SynthesisItem], target_language: &str) -> Result<String> {
    let source_count = items.first().map(|item| item.translations.len()).unwrap_or(0);
    let data = serde_json::to_string_pretty(items)?;

    Ok(format!(
        "You are an expert in Quranic Arabic and {lang} linguistics. \
         Your task is to write an improved, clear and accurate hybrid {lang} translation for every Quranic verse below. \
         For each verse, study the original Arabic text and the {count} existing {lang} translations, \
         then synthesize one final high-quality translation. \
         Respond ONLY with a valid JSON array where each object has the keys 'verse_number' and 'hybrid_translation'.\n\
         \n\
         Here is the data:\n\
         {data}",
        lang = target_language,
        count = source_count,
        data = data
    ))
}
