use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use callsift::{
    Corpus, CorpusConfig, Event, TargetSections, TopicConfig, build_corpus, export_results,
    extract_topics, load_events_from_dir, read_artifact, write_artifact,
};

#[derive(Parser)]
#[command(name = "callsift")]
#[command(author, version, about = "Earnings-call passage extraction and topic modeling pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load transcript XML files into a compressed event artifact
    Load {
        /// Directory of transcript XML files (searched recursively)
        #[arg(short, long)]
        input: PathBuf,

        /// Output events artifact (gzip JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Filter events and build the cleaned corpus
    Corpus {
        /// Events artifact produced by `load`
        #[arg(short, long)]
        events: PathBuf,

        /// Output corpus artifact (gzip JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Events before this year are dropped
        #[arg(short, long, default_value = "2022")]
        year: i32,

        /// Keywords that make a sentence relevant
        #[arg(short, long, num_args = 1.., default_values_t = [String::from("russia"), String::from("ukraine")])]
        keywords: Vec<String>,

        /// Which call sections to scan
        #[arg(short, long, value_enum, default_value = "all")]
        sections: TargetSections,

        /// Sentences of context kept around a keyword hit
        #[arg(short, long, default_value = "0")]
        window: usize,

        /// Whole paragraphs extracted after a paragraph with a hit
        #[arg(long, default_value = "0")]
        subsequent_paragraphs: usize,

        /// Merge adjacent extracted sentences
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        join: bool,

        /// Extract full answers to questions containing a keyword
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        answers: bool,

        /// Words that suppress a keyword hit when directly preceding it
        #[arg(long, num_args = 0..)]
        excluded_preceding: Vec<String>,

        /// Remove keywords from the cleaned text
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        remove_keywords: bool,

        /// Remove participant names from the cleaned text
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        remove_names: bool,

        /// Remove English stopwords from the cleaned text
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        remove_stopwords: bool,

        /// Additional words to remove from the cleaned text
        #[arg(long, num_args = 0..)]
        extra_stopwords: Vec<String>,

        /// Documents with fewer cleaned words are dropped
        #[arg(long, default_value = "2")]
        min_words: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fit the topic model and export result tables
    Topics {
        /// Corpus artifact produced by `corpus`
        #[arg(short, long)]
        corpus: PathBuf,

        /// Directory for the topics artifact and CSV exports
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Upper bound on the number of topics
        #[arg(long, default_value = "10")]
        max_topics: usize,

        /// TF-IDF-ranked terms feeding the clustering
        #[arg(long, default_value = "60")]
        keyword_pool: usize,

        /// Representative terms kept per topic
        #[arg(long, default_value = "6")]
        terms_per_topic: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            load_transcripts(input, output)
        }
        Commands::Corpus {
            events,
            output,
            year,
            keywords,
            sections,
            window,
            subsequent_paragraphs,
            join,
            answers,
            excluded_preceding,
            remove_keywords,
            remove_names,
            remove_stopwords,
            extra_stopwords,
            min_words,
            verbose,
        } => {
            setup_logging(verbose);
            let config = CorpusConfig {
                cutoff_year: year,
                keywords,
                sections,
                context_window: window,
                subsequent_paragraphs,
                join_adjacent_sentences: join,
                extract_answers: answers,
                excluded_preceding,
                remove_keywords,
                remove_names,
                remove_stopwords,
                extra_stopwords,
                min_doc_words: min_words,
                ..Default::default()
            };
            create_corpus(events, output, config)
        }
        Commands::Topics {
            corpus,
            out_dir,
            max_topics,
            keyword_pool,
            terms_per_topic,
            verbose,
        } => {
            setup_logging(verbose);
            let config = TopicConfig {
                max_topics,
                keyword_pool,
                terms_per_topic,
            };
            run_topics(corpus, out_dir, config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_transcripts(input: PathBuf, output: PathBuf) -> Result<()> {
    info!("Loading transcripts from {:?}", input);
    let summary = load_events_from_dir(&input).context("Failed to load transcripts")?;

    write_artifact(&summary.events, &output).context("Failed to write events artifact")?;

    info!(
        "Complete: {} events written to {:?} ({} files, {} skipped)",
        summary.events.len(),
        output,
        summary.files_total,
        summary.files_skipped
    );
    Ok(())
}

fn create_corpus(events_path: PathBuf, output: PathBuf, config: CorpusConfig) -> Result<()> {
    // Validate before touching any data
    config.validate().context("Invalid configuration")?;

    info!("Loading events from {:?}", events_path);
    let events: Vec<Event> =
        read_artifact(&events_path).context("Failed to read events artifact")?;
    info!("Loaded {} events", events.len());

    info!(
        "Building corpus (cutoff year {}, keywords {:?})",
        config.cutoff_year, config.keywords
    );
    let corpus = build_corpus(&events, &config);

    write_artifact(&corpus, &output).context("Failed to write corpus artifact")?;

    info!(
        "Complete: {} documents from {} events written to {:?}",
        corpus.len(),
        corpus.event_count(),
        output
    );
    Ok(())
}

fn run_topics(corpus_path: PathBuf, out_dir: PathBuf, config: TopicConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    info!("Loading corpus from {:?}", corpus_path);
    let corpus: Corpus = read_artifact(&corpus_path).context("Failed to read corpus artifact")?;
    info!("Loaded {} documents", corpus.len());

    let results = extract_topics(&corpus, &config).context("Topic extraction failed")?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
    write_artifact(&results, &out_dir.join("topics.json.gz"))
        .context("Failed to write topics artifact")?;
    export_results(&out_dir, &corpus, &results).context("Failed to write exports")?;

    // Summary
    for topic in &results.topics {
        info!(
            "Topic {:>3}: {} documents  [{}]",
            topic.id, topic.size, topic.label
        );
    }
    info!(
        "Complete: {} topics over {} documents, exports in {:?}",
        results.topics.len(),
        results.assignments.len(),
        out_dir
    );
    Ok(())
}
