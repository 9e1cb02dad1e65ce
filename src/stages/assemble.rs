use tracing::{debug, info};

use crate::config::CorpusConfig;
use crate::models::{Corpus, CorpusDocument, Event};
use crate::stages::filter::extract_passages;
use crate::stages::normalize::Normalizer;
use crate::text::has_keyword;

/// Event-level predicates, applied before any per-sentence work.
///
/// Keeps events that are dated on or after the cutoff year, are published
/// final versions, and whose collapsed corporate text mentions at least
/// one keyword (excluded-preceding rule applied).
pub fn filter_events<'a>(events: &'a [Event], config: &CorpusConfig) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| {
            event.year() >= config.cutoff_year
                && event.action == "publish"
                && event.version == "Final"
                && has_keyword(
                    &event.collapsed_all(),
                    &config.keywords,
                    &config.excluded_preceding,
                )
        })
        .collect()
}

/// Build the corpus: filter events, extract and normalize passages, drop
/// documents under the word threshold. Document order follows event input
/// order, then section and paragraph order.
pub fn build_corpus(events: &[Event], config: &CorpusConfig) -> Corpus {
    let kept = filter_events(events, config);
    info!(
        "Events kept after year/keyword filter: {}/{}",
        kept.len(),
        events.len()
    );

    let normalizer = Normalizer::new(config);
    let mut documents = Vec::new();
    let mut dropped_short = 0usize;

    for event in kept {
        let name_words = event.participant_name_words();
        for passage in extract_passages(event, config) {
            let text = normalizer.clean(&passage.text, &name_words);
            let document = CorpusDocument {
                event_id: event.id,
                company_name: event.company_name.clone(),
                company_ticker: event.company_ticker.clone(),
                year: event.year(),
                section: passage.section,
                keywords: passage.keywords.clone(),
                raw_text: passage.text,
                text,
            };
            if document.word_count() >= config.min_doc_words {
                documents.push(document);
            } else {
                dropped_short += 1;
            }
        }
    }

    if dropped_short > 0 {
        debug!(
            "Dropped {} documents under {} words",
            dropped_short, config.min_doc_words
        );
    }

    Corpus { documents }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participant, ParticipantSide, Section, SectionKind, SpeakerRole};
    use chrono::NaiveDate;

    fn event(id: i64, year: i32, company: &str, presentation_text: &str) -> Event {
        Event {
            id,
            title: format!("{company} Earnings Call"),
            city: "Munich".to_string(),
            company_name: company.to_string(),
            company_ticker: format!("{company}.DE"),
            date: NaiveDate::from_ymd_opt(year, 6, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            action: "publish".to_string(),
            story_type: "transcript".to_string(),
            version: "Final".to_string(),
            event_type_id: 7,
            event_type_name: "Earnings Conference Call".to_string(),
            last_update: None,
            source_file: format!("{year}/{id}.xml"),
            year_upload: Some(year),
            corp_participants: vec![Participant {
                name: "Jane Roe".to_string(),
                affiliation: "CEO".to_string(),
                side: ParticipantSide::Corporate,
            }],
            conf_participants: vec![],
            presentation: vec![Section {
                kind: SectionKind::Presentation,
                order: 1,
                speaker: "Jane Roe".to_string(),
                role: SpeakerRole::Corporate,
                paragraphs: vec![presentation_text.to_string()],
            }],
            qa: vec![],
        }
    }

    fn config() -> CorpusConfig {
        CorpusConfig {
            keywords: vec!["russia".to_string()],
            cutoff_year: 2022,
            ..Default::default()
        }
    }

    #[test]
    fn test_events_before_cutoff_excluded() {
        let events = vec![
            event(1, 2021, "OldCo", "Russia revenue declined materially."),
            event(2, 2022, "NewCo", "Russia revenue declined materially."),
        ];
        let corpus = build_corpus(&events, &config());
        assert!(!corpus.is_empty());
        assert!(corpus.documents.iter().all(|d| d.event_id == 2));
    }

    #[test]
    fn test_non_final_versions_excluded() {
        let mut preliminary = event(1, 2022, "Acme", "Russia revenue declined materially.");
        preliminary.version = "Preliminary".to_string();
        let corpus = build_corpus(&[preliminary], &config());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_events_without_keyword_excluded() {
        let events = vec![event(1, 2022, "Acme", "Nothing notable happened this quarter.")];
        let corpus = build_corpus(&events, &config());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_word_threshold_enforced() {
        let events = vec![event(1, 2022, "Acme", "Russia revenue declined materially.")];
        let cfg = CorpusConfig {
            min_doc_words: 2,
            ..config()
        };
        let corpus = build_corpus(&events, &cfg);
        assert!(!corpus.is_empty());
        assert!(corpus.documents.iter().all(|d| d.word_count() >= 2));

        let strict = CorpusConfig {
            min_doc_words: 50,
            ..config()
        };
        assert!(build_corpus(&events, &strict).is_empty());
    }

    #[test]
    fn test_document_order_follows_event_order() {
        let events = vec![
            event(7, 2022, "First", "Russia revenue declined materially."),
            event(3, 2022, "Second", "Russia exposure stayed limited overall."),
        ];
        let corpus = build_corpus(&events, &config());
        let ids: Vec<i64> = corpus.documents.iter().map(|d| d.event_id).collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn test_metadata_carried_onto_documents() {
        let events = vec![event(9, 2023, "Acme", "Russia revenue declined materially.")];
        let corpus = build_corpus(&events, &config());
        let doc = &corpus.documents[0];
        assert_eq!(doc.company_name, "Acme");
        assert_eq!(doc.year, 2023);
        assert_eq!(doc.section, SectionKind::Presentation);
        assert_eq!(doc.keywords, vec!["russia".to_string()]);
        assert_eq!(doc.raw_text, "Russia revenue declined materially.");
        // Keyword removal ran on the cleaned text
        assert!(!doc.text.contains("russia"));
    }
}
