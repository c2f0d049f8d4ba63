//! Merging a line's fragments into text, with script-aware spacing cleanup.
//!
//! OCR engines tuned for Latin scripts insert spurious spaces between the
//! characters of dense East-Asian text ("わ た し" for "わたし"). The fix
//! removes whitespace runs strictly between two East-Asian characters and
//! leaves everything else alone, so Latin words keep their spacing even in
//! mixed lines.

use crate::processors::types::Fragment;

/// Joins a grouped line's fragments into one string.
///
/// Fragments are concatenated in the group's established order with no
/// separator, then passed through [`collapse_east_asian_spaces`]. Pure;
/// empty input gives an empty string.
pub fn merge_line(fragments: &[&Fragment]) -> String {
    let joined: String = fragments.iter().map(|f| f.text.as_str()).collect();
    collapse_east_asian_spaces(&joined)
}

/// Removes whitespace runs that sit strictly between two East-Asian
/// characters.
///
/// A run is dropped only when the nearest non-whitespace characters on both
/// sides are East-Asian; a run touching a Latin character, or at either end
/// of the string, survives untouched. Implemented as a single char walk
/// since the matching would need look-around the `regex` crate does not
/// provide.
pub fn collapse_east_asian_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !c.is_whitespace() {
            out.push(c);
            i += 1;
            continue;
        }

        // Extend over the whole whitespace run.
        let mut end = i;
        while end < chars.len() && chars[end].is_whitespace() {
            end += 1;
        }

        let before = out.chars().next_back();
        let after = chars.get(end).copied();
        let between_east_asian = matches!((before, after), (Some(b), Some(a))
            if is_east_asian(b) && is_east_asian(a));

        if !between_east_asian {
            out.extend(&chars[i..end]);
        }
        i = end;
    }

    out
}

/// Whether a character belongs to an East-Asian script block.
///
/// Covers Hiragana, Katakana, the unified CJK ideographs (base plane and
/// Extension A), fullwidth forms, and CJK symbols and punctuation.
pub fn is_east_asian(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{FF00}'..='\u{FFEF}' // Halfwidth and Fullwidth Forms
        | '\u{3000}'..='\u{303F}' // CJK Symbols and Punctuation
    )
}
