use serde::{Deserialize, Serialize};

use super::event::SectionKind;

/// A cleaned passage paired with its event metadata; the unit fed to the
/// topic model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub event_id: i64,
    pub company_name: String,
    pub company_ticker: String,
    /// Calendar year of the call
    pub year: i32,
    pub section: SectionKind,
    /// Keywords that triggered the underlying passage, if any
    pub keywords: Vec<String>,
    /// Passage text before cleaning
    pub raw_text: String,
    /// Normalized text as it enters the topic model
    pub text: String,
}

impl CorpusDocument {
    /// Word count of the cleaned text
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Ordered document list; order follows event input order, then section
/// and paragraph order within each event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub documents: Vec<CorpusDocument>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Cleaned texts in document order, as handed to the topic model
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }

    /// Number of distinct events represented in the corpus
    pub fn event_count(&self) -> usize {
        let mut ids: Vec<i64> = self.documents.iter().map(|d| d.event_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(event_id: i64, text: &str) -> CorpusDocument {
        CorpusDocument {
            event_id,
            company_name: "Acme Corp".to_string(),
            company_ticker: "ACME.N".to_string(),
            year: 2022,
            section: SectionKind::Presentation,
            keywords: vec![],
            raw_text: text.to_string(),
            text: text.to_lowercase(),
        }
    }

    #[test]
    fn test_corpus_accessors() {
        let corpus = Corpus {
            documents: vec![doc(1, "First doc"), doc(1, "Second doc"), doc(2, "Third")],
        };
        assert_eq!(corpus.len(), 3);
        assert!(!corpus.is_empty());
        assert_eq!(corpus.event_count(), 2);
        assert_eq!(
            corpus.texts(),
            vec!["first doc", "second doc", "third"]
        );
    }
}
