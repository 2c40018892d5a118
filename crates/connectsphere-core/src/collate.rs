//! Locale-style string ordering.
//!
//! Strings compare first with accents and case folded away, then by accent,
//! then by case (lowercase first), then bytewise. `"Émile"` therefore sorts
//! next to `"Emile"` instead of after `"Zoe"`. Letters with no canonical
//! decomposition (`Ł`, `Ø`, `ß`, ...) fold to their base letters too.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    base: String,
    accents: String,
    uppercase: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(value: &str) -> Self {
        let decomposed: Vec<char> = value.nfd().collect();
        let base = decomposed
            .iter()
            .filter(|ch| !is_combining_mark(**ch))
            .flat_map(|ch| ch.to_lowercase())
            .fold(String::new(), |mut base, ch| {
                match fold_letter(ch) {
                    Some(folded) => base.push_str(folded),
                    None => base.push(ch),
                }
                base
            });
        let accents = decomposed.iter().flat_map(|ch| ch.to_lowercase()).collect();
        let uppercase = decomposed.iter().map(|ch| ch.is_uppercase()).collect();
        Self {
            base,
            accents,
            uppercase,
            raw: value.to_string(),
        }
    }
}

/// Base letters for lowercase letters that carry a stroke or ligature in the
/// glyph itself rather than a combining mark.
fn fold_letter(ch: char) -> Option<&'static str> {
    Some(match ch {
        'ł' => "l",
        'ø' => "o",
        'đ' | 'ð' => "d",
        'ħ' => "h",
        'ŧ' => "t",
        'ı' => "i",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'þ' => "th",
        _ => return None,
    })
}

pub fn compare(left: &str, right: &str) -> Ordering {
    CollationKey::new(left).cmp(&CollationKey::new(right))
}
