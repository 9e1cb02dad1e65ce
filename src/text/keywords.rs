/// Case-insensitive substring check for any keyword, with no
/// preceding-word suppression. Cheap pre-check before sentence work.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// Keywords matching in `text`, in the order they appear in `keywords`.
///
/// Matching is case-insensitive substring. An occurrence is suppressed
/// when the word immediately before it is in `excluded_preceding`; a
/// keyword matches if at least one occurrence survives suppression.
pub fn matching_keywords(
    text: &str,
    keywords: &[String],
    excluded_preceding: &[String],
) -> Vec<String> {
    let lower = text.to_lowercase();
    let excluded: Vec<String> = excluded_preceding.iter().map(|w| w.to_lowercase()).collect();

    let mut matched = Vec::new();
    for keyword in keywords {
        let needle = keyword.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if has_unsuppressed_occurrence(&lower, &needle, &excluded)
            && !matched.contains(keyword)
        {
            matched.push(keyword.clone());
        }
    }
    matched
}

/// Whether `text` contains any keyword with at least one occurrence not
/// preceded by an excluded word
pub fn has_keyword(text: &str, keywords: &[String], excluded_preceding: &[String]) -> bool {
    !matching_keywords(text, keywords, excluded_preceding).is_empty()
}

fn has_unsuppressed_occurrence(lower: &str, needle: &str, excluded: &[String]) -> bool {
    let mut from = 0usize;
    while let Some(pos) = lower[from..].find(needle) {
        let at = from + pos;
        if excluded.is_empty() || !preceded_by(lower, at, excluded) {
            return true;
        }
        from = at + needle.len();
    }
    false
}

/// Whether the word directly before byte offset `at` is one of `excluded`
fn preceded_by(lower: &str, at: usize, excluded: &[String]) -> bool {
    let before = &lower[..at];
    let trimmed = before.trim_end();
    // No whitespace between the previous word and the keyword means the
    // keyword is part of a larger word; no suppression in that case
    if trimmed.len() == before.len() && !before.is_empty() {
        return false;
    }
    let previous = trimmed
        .split_whitespace()
        .next_back()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string());
    match previous {
        Some(word) => excluded.iter().any(|e| *e == word),
        None => false,
    }
}
