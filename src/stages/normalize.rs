use std::collections::HashSet;

use stop_words::{LANGUAGE, get};

use crate::config::CorpusConfig;

/// Characters treated as currency symbols rather than punctuation
const CURRENCY: &[char] = &['$', '€', '£', '¥', '₽'];

/// Applies the configured cleaning steps to passage text.
///
/// Steps run in a fixed order — lowercase, punctuation, currency,
/// numerics, stopwords, keywords, names, extra words — each independently
/// toggleable and each operating on the previous step's output. Every
/// step is idempotent, so cleaning already-cleaned text is a no-op.
pub struct Normalizer {
    lowercase: bool,
    remove_punctuation: bool,
    remove_numeric: bool,
    remove_currency: bool,
    remove_stopwords: bool,
    stopwords: HashSet<String>,
    /// Lowercased keyword prefixes to drop (keyword removal)
    keyword_prefixes: Vec<String>,
    /// Lowercased extra-word prefixes to drop (custom word list)
    extra_prefixes: Vec<String>,
    remove_names: bool,
}

impl Normalizer {
    pub fn new(config: &CorpusConfig) -> Self {
        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English).into_iter().collect()
        } else {
            HashSet::new()
        };

        let keyword_prefixes = if config.remove_keywords {
            config.keywords.iter().map(|k| k.to_lowercase()).collect()
        } else {
            Vec::new()
        };

        Self {
            lowercase: config.lowercase,
            remove_punctuation: config.remove_punctuation,
            remove_numeric: config.remove_numeric,
            remove_currency: config.remove_currency,
            remove_stopwords: config.remove_stopwords,
            stopwords,
            keyword_prefixes,
            extra_prefixes: config
                .extra_stopwords
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            remove_names: config.remove_names,
        }
    }

    /// Clean one passage. `name_words` are the participant-name words of
    /// the passage's event, dropped when name scrubbing is on.
    pub fn clean(&self, text: &str, name_words: &[String]) -> String {
        let names: Vec<String> = if self.remove_names {
            name_words.iter().map(|w| w.to_lowercase()).collect()
        } else {
            Vec::new()
        };

        let mut tokens: Vec<String> = Vec::new();
        for raw in text.split_whitespace() {
            let mut token = raw.to_string();

            if self.lowercase {
                token = token.to_lowercase();
            }

            if self.remove_punctuation {
                token = strip_punctuation(&token);
                if token.is_empty() {
                    continue;
                }
            }

            if self.remove_currency {
                token = token.chars().filter(|c| !CURRENCY.contains(c)).collect();
                if token.is_empty() {
                    continue;
                }
            }

            if self.remove_numeric && is_numeric_token(&token) {
                continue;
            }

            let lower = token.to_lowercase();

            if self.remove_stopwords && self.stopwords.contains(&lower) {
                continue;
            }
            if self.keyword_prefixes.iter().any(|k| lower.starts_with(k)) {
                continue;
            }
            if names.contains(&lower) {
                continue;
            }
            if self.extra_prefixes.iter().any(|w| lower.starts_with(w)) {
                continue;
            }

            tokens.push(token);
        }

        tokens.join(" ")
    }
}

/// Trim leading and trailing characters that are neither alphanumeric nor
/// currency symbols; inner punctuation ("don't", "4.5") survives
fn strip_punctuation(token: &str) -> String {
    token
        .trim_matches(|c: char| !(c.is_alphanumeric() || CURRENCY.contains(&c)))
        .to_string()
}

/// A token consisting of digits and digit separators only
fn is_numeric_token(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(keywords: &[&str]) -> CorpusConfig {
        CorpusConfig {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_keywords_removed() {
        let normalizer = Normalizer::new(&config_with(&["russia"]));
        let cleaned = normalizer.clean("Exposure toward Russia remains limited", &[]);
        assert!(!cleaned.contains("russia"));
        assert!(cleaned.contains("exposure"));
    }

    #[test]
    fn test_keyword_prefix_catches_inflections() {
        let normalizer = Normalizer::new(&config_with(&["russia"]));
        let cleaned = normalizer.clean("Russian operations wound down", &[]);
        assert!(!cleaned.contains("russian"));
    }

    #[test]
    fn test_names_scrubbed() {
        let normalizer = Normalizer::new(&config_with(&["russia"]));
        let names = vec!["Jane".to_string(), "Roe".to_string()];
        let cleaned = normalizer.clean("Jane thanked everyone before closing", &names);
        assert!(!cleaned.contains("jane"));
        assert!(cleaned.contains("thanked"));
    }

    #[test]
    fn test_stopwords_numbers_currency_punctuation() {
        let normalizer = Normalizer::new(&config_with(&["russia"]));
        let cleaned = normalizer.clean("The revenue was $5 million, up 12% overall!", &[]);
        assert!(cleaned.contains("revenue"));
        assert!(cleaned.contains("million"));
        assert!(!cleaned.contains("the"), "stopword kept: {cleaned:?}");
        assert!(!cleaned.contains('$'));
        assert!(!cleaned.contains("12"));
        assert!(!cleaned.contains('!'));
    }

    #[test]
    fn test_steps_toggle_independently() {
        let config = CorpusConfig {
            lowercase: false,
            remove_stopwords: false,
            remove_keywords: false,
            remove_names: false,
            remove_numeric: false,
            remove_currency: false,
            remove_punctuation: false,
            ..config_with(&["russia"])
        };
        let normalizer = Normalizer::new(&config);
        let text = "The revenue was $5 million, up 12%";
        assert_eq!(normalizer.clean(text, &[]), text);
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let normalizer = Normalizer::new(&config_with(&["russia", "ukraine"]));
        let names = vec!["Jane".to_string()];
        let once = normalizer.clean(
            "Jane said the Russia and Ukraine exposure was $4.5 million, down 40%.",
            &names,
        );
        let twice = normalizer.clean(&once, &names);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        let normalizer = Normalizer::new(&config_with(&["russia"]));
        assert_eq!(normalizer.clean("", &[]), "");
        assert_eq!(normalizer.clean("   ", &[]), "");
    }
}
