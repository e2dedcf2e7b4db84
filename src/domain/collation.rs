//! Locale-aware title comparison.
//!
//! Approximates the Unicode root collation used by `localeCompare`:
//! letters compare by base character first, then by accents, then by case
//! (lowercase first). Ideographs have no base-letter folding and order by
//! code point, matching the root collation's implicit weights.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sort key for one title. Keys compare field by field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(u8, char)>,
    secondary: Vec<char>,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(title: &str) -> Self {
        let primary = title
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .map(|c| (class_rank(c), c))
            .collect();
        let secondary = title.nfd().flat_map(char::to_lowercase).collect();
        let tertiary = title
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .map(char::is_uppercase)
            .collect();

        Self {
            primary,
            secondary,
            tertiary,
            raw: title.to_string(),
        }
    }
}

/// Whitespace sorts before punctuation and symbols, those before digits,
/// digits before letters.
fn class_rank(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    }
}

/// Compare two optional titles; an absent title sorts as `""`.
pub fn compare_titles(a: Option<&str>, b: Option<&str>) -> Ordering {
    CollationKey::new(a.unwrap_or("")).cmp(&CollationKey::new(b.unwrap_or("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &str, b: &str) -> Ordering {
        compare_titles(Some(a), Some(b))
    }

    #[test]
    fn given_mixed_case_when_comparing_then_base_letter_wins_over_case() {
        assert_eq!(cmp("a", "B"), Ordering::Less);
        assert_eq!(cmp("B", "c"), Ordering::Less);
        assert_eq!(cmp("a", "A"), Ordering::Less);
    }

    #[test]
    fn given_accents_when_comparing_then_accent_is_secondary() {
        assert_eq!(cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(cmp("résumé", "resumf"), Ordering::Less);
    }

    #[test]
    fn given_character_classes_when_comparing_then_ranks_apply() {
        assert_eq!(cmp(" x", "_x"), Ordering::Less);
        assert_eq!(cmp("_x", "1"), Ordering::Less);
        assert_eq!(cmp("9", "a"), Ordering::Less);
        assert_eq!(cmp("10", "9"), Ordering::Less);
    }

    #[test]
    fn given_absent_title_when_comparing_then_sorts_as_empty() {
        assert_eq!(compare_titles(None, Some("")), Ordering::Equal);
        assert_eq!(compare_titles(None, Some("a")), Ordering::Less);
    }

    #[test]
    fn given_ideographs_when_comparing_then_code_point_order() {
        assert_eq!(cmp("名称", "工料概要说明"), Ordering::Less);
        assert_eq!(cmp("工料概要说明", "编号"), Ordering::Less);
    }

    #[test]
    fn given_latin_and_han_when_comparing_then_latin_first() {
        assert_eq!(cmp("zeta", "名称"), Ordering::Less);
    }
}
