use serde::{Deserialize, Serialize};

/// Topic id for documents that share no terms with any topic
pub const OUTLIER_TOPIC: i32 = -1;

/// A topic cluster with its representative terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Topic id; non-negative for real topics, [`OUTLIER_TOPIC`] otherwise
    pub id: i32,
    /// Human-readable label built from the top terms
    pub label: String,
    /// Representative terms, strongest first
    pub terms: Vec<String>,
    /// Number of documents assigned to this topic
    pub size: usize,
}

/// Topic assigned to one corpus document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAssignment {
    /// Index into the corpus document list
    pub doc_index: usize,
    pub topic_id: i32,
    /// Share of the document's term mass carried by the topic, in [0, 1];
    /// 0 for outliers
    pub score: f64,
}

/// Per company and year: how many documents and which topics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyYearSummary {
    pub company_name: String,
    pub year: i32,
    pub documents: usize,
    /// Sorted distinct topic ids, outlier excluded
    pub topics: Vec<i32>,
}

/// Everything the topic stage produces for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicResults {
    pub topics: Vec<Topic>,
    pub assignments: Vec<TopicAssignment>,
    pub summaries: Vec<CompanyYearSummary>,
}

impl TopicResults {
    /// Look up a topic descriptor by id
    pub fn topic(&self, id: i32) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_lookup() {
        let results = TopicResults {
            topics: vec![
                Topic {
                    id: 0,
                    label: "supply / chain".to_string(),
                    terms: vec!["supply".to_string(), "chain".to_string()],
                    size: 3,
                },
                Topic {
                    id: OUTLIER_TOPIC,
                    label: "outlier".to_string(),
                    terms: vec![],
                    size: 1,
                },
            ],
            assignments: vec![],
            summaries: vec![],
        };
        assert_eq!(results.topic(0).unwrap().label, "supply / chain");
        assert!(results.topic(7).is_none());
    }
}
