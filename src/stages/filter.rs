use crate::config::CorpusConfig;
use crate::models::{Event, ExtractionReason, Passage, Section, SpeakerRole};
use crate::text::{contains_any, keyword_windows, matching_keywords, split_sentences};

/// Extract every relevant passage from one event.
///
/// The presentation contributes only corporate-speaker sections. The Q&A
/// runs a small state machine: operator turns are skipped, non-corporate
/// turns are questions (scanned for keywords but never extracted), and
/// corporate turns are answers, taken whole when the preceding question
/// had a keyword and `extract_answers` is on, keyword-scanned otherwise.
pub fn extract_passages(event: &Event, config: &CorpusConfig) -> Vec<Passage> {
    let mut passages = Vec::new();

    if config.sections.includes_presentation() {
        for section in &event.presentation {
            if section.role != SpeakerRole::Corporate {
                continue;
            }
            passages.extend(scan_section(event.id, section, config));
        }
    }

    if config.sections.includes_qa() {
        let mut question_keywords: Vec<String> = Vec::new();
        for section in &event.qa {
            match section.role {
                SpeakerRole::Operator => continue,
                SpeakerRole::Conference | SpeakerRole::Unknown => {
                    // A question: record whether it mentions a keyword.
                    // The state holds across consecutive answers and is
                    // replaced by the next question.
                    question_keywords =
                        matching_keywords(&section.text(), &config.keywords, &[]);
                }
                SpeakerRole::Corporate => {
                    if !question_keywords.is_empty() && config.extract_answers {
                        if let Some(passage) = whole_section_passage(
                            event.id,
                            section,
                            question_keywords.clone(),
                        ) {
                            passages.push(passage);
                        }
                        continue;
                    }
                    passages.extend(scan_section(event.id, section, config));
                }
            }
        }
    }

    passages
}

/// Scan one section paragraph by paragraph.
///
/// `since_hit` counts paragraphs since the last keyword hit; the
/// `subsequent_paragraphs` option extracts that many whole paragraphs
/// after a hit paragraph without requiring their own keyword.
fn scan_section(event_id: i64, section: &Section, config: &CorpusConfig) -> Vec<Passage> {
    let mut passages = Vec::new();
    let mut since_hit: Option<usize> = None;

    for (paragraph_index, paragraph) in section.paragraphs.iter().enumerate() {
        if paragraph.trim().is_empty() {
            if let Some(since) = since_hit.as_mut() {
                *since += 1;
            }
            continue;
        }

        if contains_any(paragraph, &config.keywords) {
            since_hit = Some(0);
            passages.extend(scan_paragraph(event_id, section, paragraph_index, paragraph, config));
        } else if let Some(since) = since_hit {
            // `since` is at least 1 here; the first following paragraph
            // sees 1, so the option counts whole paragraphs after the hit
            if since <= config.subsequent_paragraphs {
                let sentences = split_sentences(paragraph);
                passages.push(Passage {
                    event_id,
                    section: section.kind,
                    section_order: section.order,
                    speaker_role: section.role,
                    paragraph_index,
                    sentence_range: (0, sentences.len().saturating_sub(1)),
                    keywords: Vec::new(),
                    reason: ExtractionReason::SubsequentParagraph,
                    text: paragraph.trim().to_string(),
                });
            }
        }

        if let Some(since) = since_hit.as_mut() {
            *since += 1;
        }
    }

    passages
}

/// Sentence-level extraction within one paragraph that is known to
/// contain a keyword somewhere
fn scan_paragraph(
    event_id: i64,
    section: &Section,
    paragraph_index: usize,
    paragraph: &str,
    config: &CorpusConfig,
) -> Vec<Passage> {
    let sentences = split_sentences(paragraph);
    let mut hits = Vec::new();
    for (idx, sentence) in sentences.iter().enumerate() {
        if !matching_keywords(sentence, &config.keywords, &config.excluded_preceding).is_empty() {
            hits.push(idx);
        }
    }
    // The paragraph-level check is plain substring; every occurrence can
    // still be suppressed by an excluded preceding word
    if hits.is_empty() {
        return Vec::new();
    }

    let spans = keyword_windows(
        &hits,
        config.context_window,
        sentences.len(),
        config.join_adjacent_sentences,
    );

    spans
        .into_iter()
        .map(|(start, end)| {
            let text = sentences[start..=end].join(" ");
            let keywords = matching_keywords(&text, &config.keywords, &config.excluded_preceding);
            Passage {
                event_id,
                section: section.kind,
                section_order: section.order,
                speaker_role: section.role,
                paragraph_index,
                sentence_range: (start, end),
                keywords,
                reason: ExtractionReason::KeywordMatch,
                text,
            }
        })
        .collect()
}

/// The answer rule: the whole section becomes one passage, carrying the
/// keywords of the question that triggered it
fn whole_section_passage(
    event_id: i64,
    section: &Section,
    question_keywords: Vec<String>,
) -> Option<Passage> {
    let text = section.text().trim().to_string();
    if text.is_empty() {
        return None;
    }
    let sentence_count = split_sentences(&text).len();
    Some(Passage {
        event_id,
        section: section.kind,
        section_order: section.order,
        speaker_role: section.role,
        paragraph_index: 0,
        sentence_range: (0, sentence_count.saturating_sub(1)),
        keywords: question_keywords,
        reason: ExtractionReason::AnswerToKeywordQuestion,
        text,
    })
}
