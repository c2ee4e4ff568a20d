//! Name normalization used for duplicate detection
//!
//! Catalog names (equipment, activity categories, activities) are compared
//! through a normalized key: diacritics removed, lower-cased, trimmed and
//! with internal whitespace collapsed to a single space. The key is stored
//! alongside the display name (`name_key`).

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block (U+0300..U+036F)
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Build the dedup key for a name.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim a display name, returning `None` when nothing is left.
pub fn clean_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim an optional text field; blank values become `None`.
pub fn trim_opt(value: Option<&str>) -> Option<String> {
    value.and_then(clean_name)
}

/// Whether two names collide once normalized.
pub fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize_name("Motorna pila Štihl"), "motorna pila stihl");
        assert_eq!(normalize_name("Čizme ŽUTE"), "cizme zute");
        assert_eq!(normalize_name("Ćelija Đ"), "celija đ");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_name("  Tlačna   cijev \t C  "), "tlacna cijev c");
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_same_name() {
        assert!(same_name("Vježba", "VJEZBA "));
        assert!(!same_name("Vježba", "Vježbe"));
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Pumpa "), Some("Pumpa".to_string()));
        assert_eq!(clean_name(" \n "), None);
        assert_eq!(trim_opt(Some(" 091 ")), Some("091".to_string()));
        assert_eq!(trim_opt(Some("")), None);
    }
}
