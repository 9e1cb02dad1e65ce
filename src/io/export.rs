use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{Corpus, OUTLIER_TOPIC, TopicResults};

/// Write the three result tables into `out_dir`: per-document
/// assignments, topic descriptors, and company/year aggregates.
pub fn export_results(out_dir: &Path, corpus: &Corpus, results: &TopicResults) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    write_documents_csv(&out_dir.join("documents.csv"), corpus, results)?;
    write_topics_csv(&out_dir.join("topics.csv"), results)?;
    write_company_year_csv(&out_dir.join("company_year.csv"), results)?;

    info!("Exports written to {:?}", out_dir);
    Ok(())
}

/// One row per corpus document with its topic assignment
pub fn write_documents_csv(path: &Path, corpus: &Corpus, results: &TopicResults) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record([
        "event_id",
        "company_name",
        "company_ticker",
        "year",
        "section",
        "keywords",
        "topic_id",
        "topic_label",
        "score",
        "text",
    ])?;

    for assignment in &results.assignments {
        let document = &corpus.documents[assignment.doc_index];
        let label = results
            .topic(assignment.topic_id)
            .map(|t| t.label.as_str())
            .unwrap_or("");
        writer.write_record([
            document.event_id.to_string().as_str(),
            document.company_name.as_str(),
            document.company_ticker.as_str(),
            document.year.to_string().as_str(),
            document.section.tag(),
            document.keywords.join(";").as_str(),
            assignment.topic_id.to_string().as_str(),
            label,
            format!("{:.4}", assignment.score).as_str(),
            document.text.as_str(),
        ])?;
    }

    writer.flush().context("Failed to flush documents.csv")?;
    Ok(())
}

/// One row per topic with its representative terms
pub fn write_topics_csv(path: &Path, results: &TopicResults) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(["topic_id", "label", "terms", "size"])?;

    for topic in &results.topics {
        writer.write_record([
            topic.id.to_string().as_str(),
            topic.label.as_str(),
            topic.terms.join(";").as_str(),
            topic.size.to_string().as_str(),
        ])?;
    }

    writer.flush().context("Failed to flush topics.csv")?;
    Ok(())
}

/// One row per company and year with document count and distinct topics
pub fn write_company_year_csv(path: &Path, results: &TopicResults) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(["company_name", "year", "documents", "topics"])?;

    for summary in &results.summaries {
        let topics: Vec<String> = summary
            .topics
            .iter()
            .filter(|&&id| id != OUTLIER_TOPIC)
            .map(|id| id.to_string())
            .collect();
        writer.write_record([
            summary.company_name.as_str(),
            summary.year.to_string().as_str(),
            summary.documents.to_string().as_str(),
            topics.join(";").as_str(),
        ])?;
    }

    writer.flush().context("Failed to flush company_year.csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompanyYearSummary, CorpusDocument, SectionKind, Topic, TopicAssignment,
    };

    fn sample() -> (Corpus, TopicResults) {
        let corpus = Corpus {
            documents: vec![CorpusDocument {
                event_id: 3,
                company_name: "Acme".to_string(),
                company_ticker: "ACME.N".to_string(),
                year: 2022,
                section: SectionKind::Presentation,
                keywords: vec!["russia".to_string()],
                raw_text: "Raw.".to_string(),
                text: "supply chain".to_string(),
            }],
        };
        let results = TopicResults {
            topics: vec![Topic {
                id: 0,
                label: "supply / chain".to_string(),
                terms: vec!["supply".to_string(), "chain".to_string()],
                size: 1,
            }],
            assignments: vec![TopicAssignment {
                doc_index: 0,
                topic_id: 0,
                score: 0.9,
            }],
            summaries: vec![CompanyYearSummary {
                company_name: "Acme".to_string(),
                year: 2022,
                documents: 1,
                topics: vec![0],
            }],
        };
        (corpus, results)
    }

    #[test]
    fn test_export_writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let (corpus, results) = sample();
        export_results(dir.path(), &corpus, &results).unwrap();

        let documents = std::fs::read_to_string(dir.path().join("documents.csv")).unwrap();
        assert!(documents.starts_with("event_id,"));
        assert!(documents.contains("supply / chain"));
        assert!(documents.contains("0.9000"));

        let topics = std::fs::read_to_string(dir.path().join("topics.csv")).unwrap();
        assert!(topics.contains("supply;chain"));

        let company_year = std::fs::read_to_string(dir.path().join("company_year.csv")).unwrap();
        assert!(company_year.contains("Acme,2022,1,0"));
    }
}
