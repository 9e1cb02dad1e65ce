use serde::{Deserialize, Serialize};

use super::event::{SectionKind, SpeakerRole};

/// Why a passage was extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionReason {
    /// A keyword matched inside the passage itself
    KeywordMatch,
    /// The preceding question contained a keyword (Q&A answer rule)
    AnswerToKeywordQuestion,
    /// The paragraph follows a keyword hit (subsequent-paragraph rule)
    SubsequentParagraph,
}

/// A contiguous extracted span of transcript text with its provenance.
///
/// Every passage traces back to exactly one event and one section; the
/// sentence range is an inclusive index pair within the source paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub event_id: i64,
    pub section: SectionKind,
    /// Appearance number of the section the passage came from
    pub section_order: u32,
    pub speaker_role: SpeakerRole,
    /// Index of the source paragraph within the section
    pub paragraph_index: usize,
    /// Inclusive sentence index range within the paragraph; covers the
    /// whole paragraph for answer-rule and subsequent-paragraph passages
    pub sentence_range: (usize, usize),
    /// Keywords that triggered the extraction; empty for passages taken by
    /// the answer or subsequent-paragraph rules
    pub keywords: Vec<String>,
    pub reason: ExtractionReason,
    pub text: String,
}

impl Passage {
    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
