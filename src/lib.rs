pub mod config;
pub mod io;
pub mod models;
pub mod stages;
pub mod text;

pub use config::{ConfigError, CorpusConfig, TargetSections, TopicConfig};
pub use io::{
    LoadSummary, export_results, load_events_from_dir, parse_event_xml, read_artifact,
    write_artifact,
};
pub use models::{
    CompanyYearSummary, Corpus, CorpusDocument, Event, Participant, Passage, Section, SectionKind,
    SpeakerRole, Topic, TopicAssignment, TopicResults,
};
pub use stages::{Normalizer, build_corpus, extract_passages, extract_topics, filter_events};
