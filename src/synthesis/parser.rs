//! Lenient parsing of the model's reply.
//!
//! Models wrap their answer in prose or markdown fences, so the reply is
//! narrowed to the span from the first `[` to the last `]` before it is
//! decoded as JSON.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, HybridError};
use crate::types::SynthesisResult;

#[derive(Debug, Deserialize)]
struct ReplyEntry {
    verse_number: VerseNumber,
    hybrid_translation: String,
}

/// Models sometimes quote numbers, and sometimes invent negative ones
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerseNumber {
    Number(serde_json::Number),
    Text(String),
}

impl VerseNumber {
    /// `Ok(None)` for a number no verse can carry, `Err` for non-numbers
    fn value(&self) -> std::result::Result<Option<u32>, ()> {
        match self {
            VerseNumber::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(u32::try_from(u).ok())
                } else if n.as_i64().is_some() {
                    Ok(None)
                } else {
                    Ok(n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                        .map(|f| f as u32))
                }
            }
            VerseNumber::Text(s) => s
                .trim()
                .parse::<i128>()
                .map(|n| u32::try_from(n).ok())
                .map_err(|_| ()),
        }
    }
}

/// Span from the first `[` to the last `]`, inclusive
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Decode a reply into a verse number to hybrid translation map
pub fn parse_reply(text: &str) -> Result<SynthesisResult> {
    let json = extract_json_array(text)
        .ok_or_else(|| HybridError::SynthesisParse("no JSON array found in reply".to_string()))?;

    let entries: Vec<ReplyEntry> = serde_json::from_str(json)
        .map_err(|e| HybridError::SynthesisParse(e.to_string()))?;

    if entries.is_empty() {
        return Err(HybridError::SynthesisParse("reply contained no translations".to_string()));
    }

    let mut result = SynthesisResult::new();
    for entry in entries {
        let number = match entry.verse_number.value() {
            Ok(Some(number)) => number,
            Ok(None) => {
                debug!("Ignoring reply entry with out-of-range verse_number {:?}", entry.verse_number);
                continue;
            }
            Err(()) => {
                return Err(HybridError::SynthesisParse(format!(
                    "invalid verse_number {:?}", entry.verse_number
                )));
            }
        };
        if result.insert(number, entry.hybrid_translation.trim().to_string()).is_some() {
            debug!("Reply repeated verse {}, keeping the later entry", number);
        }
    }

    Ok(result)
}
