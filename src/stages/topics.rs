use std::collections::BTreeMap;

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{LANGUAGE, get};
use tracing::info;

use crate::config::TopicConfig;
use crate::models::{
    CompanyYearSummary, Corpus, OUTLIER_TOPIC, Topic, TopicAssignment, TopicResults,
};

/// Seam for the topic-modeling backend; the pipeline only sees this
/// trait, so the TF-IDF implementation can be swapped without touching
/// the stages around it.
pub trait TopicModel {
    /// Fit the model on the documents, in order, and return topics plus
    /// one assignment per document (same order as the input).
    fn fit(&self, docs: &[String]) -> Result<ModelFit>;
}

/// Raw model output before company/year aggregation
#[derive(Debug, Clone)]
pub struct ModelFit {
    pub topics: Vec<Topic>,
    pub assignments: Vec<TopicAssignment>,
}

/// One term cluster produced by the model, before sizing
#[derive(Debug, Clone)]
struct TermCluster {
    /// (term, tf-idf score), strongest first
    terms: Vec<(String, f32)>,
}

/// TF-IDF topic model.
///
/// Scoring is delegated to the `keyword_extraction` crate with each
/// document as its own unit for IDF, then the top-ranked terms are
/// clustered by document co-occurrence (greedy seed expansion). Each
/// document is assigned the cluster carrying the largest share of its
/// term mass; documents touching no cluster get the outlier topic.
pub struct TfIdfTopicModel {
    config: TopicConfig,
}

impl TfIdfTopicModel {
    pub fn new(config: TopicConfig) -> Self {
        Self { config }
    }
}

impl TopicModel for TfIdfTopicModel {
    fn fit(&self, docs: &[String]) -> Result<ModelFit> {
        if docs.is_empty() {
            anyhow::bail!("corpus is empty; nothing to model");
        }

        let stop_words: Vec<String> = get(LANGUAGE::English);

        let params = TfIdfParams::UnprocessedDocuments(docs, &stop_words, None);
        let tfidf = TfIdf::new(params);
        let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(self.config.keyword_pool);

        if ranked.is_empty() {
            anyhow::bail!(
                "TF-IDF produced no terms from {} documents; corpus may be too short or uniform",
                docs.len()
            );
        }

        info!(
            terms = ranked.len(),
            top_term = %ranked[0].0,
            "Ranked TF-IDF terms"
        );

        let clusters = cluster_terms(
            &ranked,
            docs,
            self.config.max_topics,
            self.config.terms_per_topic,
        );
        let assignments = assign_documents(docs, &clusters);

        // Size topics from the assignments
        let mut sizes = vec![0usize; clusters.len()];
        let mut outliers = 0usize;
        for assignment in &assignments {
            if assignment.topic_id == OUTLIER_TOPIC {
                outliers += 1;
            } else {
                sizes[assignment.topic_id as usize] += 1;
            }
        }

        let mut topics: Vec<Topic> = clusters
            .iter()
            .enumerate()
            .map(|(id, cluster)| {
                let terms: Vec<String> = cluster.terms.iter().map(|(t, _)| t.clone()).collect();
                Topic {
                    id: id as i32,
                    label: cluster_label(&terms),
                    terms,
                    size: sizes[id],
                }
            })
            .collect();
        if outliers > 0 {
            topics.push(Topic {
                id: OUTLIER_TOPIC,
                label: "outlier".to_string(),
                terms: Vec::new(),
                size: outliers,
            });
        }

        Ok(ModelFit { topics, assignments })
    }
}

/// Group the ranked terms into clusters by document co-occurrence.
///
/// Greedy: seed with the strongest unassigned term, pull in its most
/// co-occurring unassigned terms up to the per-topic limit.
fn cluster_terms(
    ranked: &[(String, f32)],
    docs: &[String],
    max_clusters: usize,
    terms_per_cluster: usize,
) -> Vec<TermCluster> {
    let terms: Vec<String> = ranked.iter().map(|(t, _)| t.to_lowercase()).collect();

    // Which terms appear in which document
    let doc_terms: Vec<Vec<usize>> = docs
        .iter()
        .map(|doc| {
            let lower = doc.to_lowercase();
            terms
                .iter()
                .enumerate()
                .filter(|(_, term)| lower.contains(term.as_str()))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let n = terms.len();
    let mut cooccurrence = vec![vec![0u32; n]; n];
    for present in &doc_terms {
        for &i in present {
            for &j in present {
                if i != j {
                    cooccurrence[i][j] += 1;
                }
            }
        }
    }

    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();

    for seed in 0..n {
        if clusters.len() >= max_clusters {
            break;
        }
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        let mut candidates: Vec<(usize, u32)> = (0..n)
            .filter(|&i| !assigned[i] && cooccurrence[seed][i] > 0)
            .map(|i| (i, cooccurrence[seed][i]))
            .collect();
        // Strongest co-occurrence first; rank order breaks ties
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (idx, _) in candidates.into_iter().take(terms_per_cluster.saturating_sub(1)) {
            assigned[idx] = true;
            members.push(idx);
        }

        clusters.push(TermCluster {
            terms: members
                .into_iter()
                .map(|i| (terms[i].clone(), ranked[i].1))
                .collect(),
        });
    }

    clusters
}

/// Assign each document to the cluster holding the largest share of its
/// term mass; [`OUTLIER_TOPIC`] when no cluster term occurs at all
fn assign_documents(docs: &[String], clusters: &[TermCluster]) -> Vec<TopicAssignment> {
    docs.iter()
        .enumerate()
        .map(|(doc_index, doc)| {
            let lower = doc.to_lowercase();
            let mut cluster_mass: Vec<f64> = Vec::with_capacity(clusters.len());
            for cluster in clusters {
                let mass: f64 = cluster
                    .terms
                    .iter()
                    .filter(|(term, _)| lower.contains(term.as_str()))
                    .map(|(_, score)| *score as f64)
                    .sum();
                cluster_mass.push(mass);
            }

            let total: f64 = cluster_mass.iter().sum();
            let best = cluster_mass
                .iter()
                .copied()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .filter(|&(_, mass)| mass > 0.0);

            match best {
                Some((topic, mass)) => TopicAssignment {
                    doc_index,
                    topic_id: topic as i32,
                    score: mass / total,
                },
                None => TopicAssignment {
                    doc_index,
                    topic_id: OUTLIER_TOPIC,
                    score: 0.0,
                },
            }
        })
        .collect()
}

/// Short label from the strongest terms of a cluster
fn cluster_label(terms: &[String]) -> String {
    let top: Vec<&str> = terms.iter().take(3).map(|s| s.as_str()).collect();
    top.join(" / ")
}

/// Aggregate assignments into per company/year rows, sorted by company
/// then year
pub fn summarize_by_company_year(
    corpus: &Corpus,
    assignments: &[TopicAssignment],
) -> Vec<CompanyYearSummary> {
    let mut grouped: BTreeMap<(String, i32), (usize, Vec<i32>)> = BTreeMap::new();
    for assignment in assignments {
        let document = &corpus.documents[assignment.doc_index];
        let entry = grouped
            .entry((document.company_name.clone(), document.year))
            .or_default();
        entry.0 += 1;
        if assignment.topic_id != OUTLIER_TOPIC && !entry.1.contains(&assignment.topic_id) {
            entry.1.push(assignment.topic_id);
        }
    }

    grouped
        .into_iter()
        .map(|((company_name, year), (documents, mut topics))| {
            topics.sort_unstable();
            CompanyYearSummary {
                company_name,
                year,
                documents,
                topics,
            }
        })
        .collect()
}

/// Run the topic stage end to end: fit the model on the corpus texts and
/// aggregate by company and year. A model failure is fatal for the run.
pub fn extract_topics(corpus: &Corpus, config: &TopicConfig) -> Result<TopicResults> {
    let model = TfIdfTopicModel::new(config.clone());
    let docs = corpus.texts();
    let fit = model.fit(&docs)?;

    info!(
        topics = fit.topics.len(),
        documents = fit.assignments.len(),
        "Topic model fitted"
    );

    let summaries = summarize_by_company_year(corpus, &fit.assignments);

    Ok(TopicResults {
        topics: fit.topics,
        assignments: fit.assignments,
        summaries,
    })
}
