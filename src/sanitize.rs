use once_cell::sync::Lazy;
use regex::Regex;

/// Inline footnote markers, e.g. `<sup foot_note=123>1</sup>`
static FOOTNOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<sup.*?</sup>").expect("footnote"));

/// Strip footnote markup from translation text and trim it.
///
/// Removal repeats until no marker is left, so the result is stable under
/// a second pass even when removing one span splices another together.
pub fn clean_footnotes(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = FOOTNOTE_RE.replace_all(&current, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}
