use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which parts of a call the passage filter scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetSections {
    All,
    Presentation,
    Qa,
}

impl TargetSections {
    pub fn includes_presentation(&self) -> bool {
        matches!(self, TargetSections::All | TargetSections::Presentation)
    }

    pub fn includes_qa(&self) -> bool {
        matches!(self, TargetSections::All | TargetSections::Qa)
    }
}

/// Configuration error; raised before any processing starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("keyword list must not be empty")]
    NoKeywords,
    #[error("keyword {0:?} is blank")]
    BlankKeyword(String),
    #[error("cutoff year {0} is outside 1900..=2100")]
    CutoffYearOutOfRange(i32),
    #[error("minimum document word count must be at least 1")]
    ZeroMinWords,
    #[error("max topics must be at least 1")]
    ZeroMaxTopics,
    #[error("ranked keyword pool ({pool}) must not be smaller than terms per topic ({terms})")]
    KeywordPoolTooSmall { pool: usize, terms: usize },
}

/// All options controlling event filtering, passage extraction and
/// normalization. One flat record; every toggle is independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Events dated before this year are dropped
    pub cutoff_year: i32,
    /// Keywords that make a sentence (and an event) relevant
    pub keywords: Vec<String>,
    /// Which call sections are scanned
    pub sections: TargetSections,
    /// Sentences of context kept on each side of a keyword hit
    pub context_window: usize,
    /// Whole paragraphs extracted after a paragraph with a hit
    pub subsequent_paragraphs: usize,
    /// Merge extracted spans that end up adjacent (forced on when
    /// `context_window` > 0)
    pub join_adjacent_sentences: bool,
    /// Extract a full answer when the preceding question had a keyword
    pub extract_answers: bool,
    /// A keyword occurrence does not count when directly preceded by one
    /// of these words
    pub excluded_preceding: Vec<String>,
    /// Lowercase the cleaned text
    pub lowercase: bool,
    /// Strip punctuation characters from tokens
    pub remove_punctuation: bool,
    /// Drop purely numeric tokens
    pub remove_numeric: bool,
    /// Drop currency-symbol tokens
    pub remove_currency: bool,
    /// Drop English stopwords
    pub remove_stopwords: bool,
    /// Drop tokens starting with one of the configured keywords
    pub remove_keywords: bool,
    /// Drop tokens matching a participant name word of the same event
    pub remove_names: bool,
    /// Extra words dropped like keywords (prefix match)
    pub extra_stopwords: Vec<String>,
    /// Documents with fewer cleaned words than this are dropped
    pub min_doc_words: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            cutoff_year: 2022,
            keywords: vec!["russia".to_string(), "ukraine".to_string()],
            sections: TargetSections::All,
            context_window: 0,
            subsequent_paragraphs: 0,
            join_adjacent_sentences: true,
            extract_answers: true,
            excluded_preceding: Vec::new(),
            lowercase: true,
            remove_punctuation: true,
            remove_numeric: true,
            remove_currency: true,
            remove_stopwords: true,
            remove_keywords: true,
            remove_names: true,
            extra_stopwords: Vec::new(),
            min_doc_words: 2,
        }
    }
}

impl CorpusConfig {
    /// Fail fast on an unusable configuration; nothing is processed on
    /// error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        for keyword in &self.keywords {
            if keyword.trim().is_empty() {
                return Err(ConfigError::BlankKeyword(keyword.clone()));
            }
        }
        if !(1900..=2100).contains(&self.cutoff_year) {
            return Err(ConfigError::CutoffYearOutOfRange(self.cutoff_year));
        }
        if self.min_doc_words == 0 {
            return Err(ConfigError::ZeroMinWords);
        }
        Ok(())
    }
}

/// Options for the topic-model stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Upper bound on the number of topic clusters
    pub max_topics: usize,
    /// How many TF-IDF-ranked terms feed the clustering
    pub keyword_pool: usize,
    /// Representative terms kept per topic
    pub terms_per_topic: usize,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            max_topics: 10,
            keyword_pool: 60,
            terms_per_topic: 6,
        }
    }
}

impl TopicConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_topics == 0 {
            return Err(ConfigError::ZeroMaxTopics);
        }
        if self.keyword_pool < self.terms_per_topic {
            return Err(ConfigError::KeywordPoolTooSmall {
                pool: self.keyword_pool,
                terms: self.terms_per_topic,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CorpusConfig::default().validate().is_ok());
        assert!(TopicConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let config = CorpusConfig {
            keywords: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoKeywords)));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let config = CorpusConfig {
            keywords: vec!["russia".to_string(), "  ".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BlankKeyword(_))));
    }

    #[test]
    fn test_cutoff_year_range() {
        let config = CorpusConfig {
            cutoff_year: 1820,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CutoffYearOutOfRange(1820))
        ));
    }

    #[test]
    fn test_zero_min_words_rejected() {
        let config = CorpusConfig {
            min_doc_words: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMinWords)));
    }

    #[test]
    fn test_topic_pool_smaller_than_terms_rejected() {
        let config = TopicConfig {
            keyword_pool: 3,
            terms_per_topic: 6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::KeywordPoolTooSmall { .. })
        ));
    }

    #[test]
    fn test_sections_flags() {
        assert!(TargetSections::All.includes_presentation());
        assert!(TargetSections::All.includes_qa());
        assert!(TargetSections::Presentation.includes_presentation());
        assert!(!TargetSections::Presentation.includes_qa());
        assert!(!TargetSections::Qa.includes_presentation());
        assert!(TargetSections::Qa.includes_qa());
    }
}
