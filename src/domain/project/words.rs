//! Whole-word matching over lower-cased Spanish/English text.

/// Position of `needle` in `haystack` as a whole word, allowing a plural
/// "s"/"es" suffix.
pub fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    find(haystack, needle, true)
}

/// True when `needle` appears in `haystack` as a whole word, exactly.
pub fn contains_exact_word(haystack: &str, needle: &str) -> bool {
    find(haystack, needle, false).is_some()
}

fn find(haystack: &str, needle: &str, allow_plural: bool) -> Option<usize> {
    haystack.match_indices(needle).map(|(i, _)| i).find(|&i| {
        let before_ok = haystack[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let rest = &haystack[i + needle.len()..];
        let rest = if allow_plural {
            rest.strip_prefix("es")
                .filter(|r| ends_word(r))
                .or_else(|| rest.strip_prefix('s').filter(|r| ends_word(r)))
                .unwrap_or(rest)
        } else {
            rest
        };
        before_ok && ends_word(rest)
    })
}

fn ends_word(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_whole_words_and_plurals() {
        assert_eq!(find_word("una cerca nueva", "cerca"), Some(4));
        assert_eq!(find_word("dos cercas", "cerca"), Some(4));
        assert_eq!(find_word("los materiales", "material"), Some(4));
        assert_eq!(find_word("estoy acercando", "cerca"), None);
    }

    #[test]
    fn exact_words_reject_plurals_and_longer_words() {
        assert!(contains_exact_word("¿qué altura?", "altura"));
        assert!(contains_exact_word("ciudad y estado", "estado"));
        assert!(!contains_exact_word("real estate", "state"));
        assert!(!contains_exact_word("estados unidos", "estado"));
    }
}
