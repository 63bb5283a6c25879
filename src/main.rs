use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use intro_rubric::heuristics::{detect_keywords, stage_offsets};
use intro_rubric::metrics::{
    filler_rate, sentence_count, type_token_ratio, unique_word_count, word_count,
};
use intro_rubric::models::{display_float, round_to};
use intro_rubric::scoring::words_per_minute;
use intro_rubric::{
    load_transcript, write_csv_file, write_json, BackendConfig, Backends, RubricEngine,
    ScoreReport, Transcript, CANONICAL_KEYWORDS,
};

#[derive(Parser)]
#[command(name = "intro-rubric")]
#[command(author, version, about = "Rubric scoring for spoken self-introductions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the transcript comes from
#[derive(Args)]
struct TranscriptArgs {
    /// Transcript text file (UTF-8, Latin-1 accepted)
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Transcript text given inline
    #[arg(short, long)]
    text: Option<String>,

    /// Speaking duration in seconds
    #[arg(short, long)]
    duration: Option<String>,
}

impl TranscriptArgs {
    fn load(&self) -> Result<Transcript> {
        load_transcript(
            self.input.as_deref(),
            self.text.as_deref(),
            self.duration.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a transcript against the rubric
    Score {
        #[command(flatten)]
        transcript: TranscriptArgs,

        /// Write the structured result as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the tabular export as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the human-readable report to a file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip every backend and use the heuristic fallbacks
        #[arg(long)]
        heuristics_only: bool,

        /// LanguageTool server base URL (overrides RUBRIC_LANGUAGETOOL_URL)
        #[arg(long)]
        languagetool_url: Option<String>,

        /// Embeddings endpoint URL (overrides RUBRIC_EMBEDDINGS_URL)
        #[arg(long)]
        embeddings_url: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print raw text metrics without scoring
    Analyze {
        #[command(flatten)]
        transcript: TranscriptArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            transcript,
            json,
            csv,
            report,
            heuristics_only,
            languagetool_url,
            embeddings_url,
            verbose,
        } => {
            setup_logging(verbose);
            let backends = if heuristics_only {
                info!("Backends disabled (--heuristics-only)");
                Backends::disabled()
            } else {
                let mut config = BackendConfig::from_env()?;
                if languagetool_url.is_some() {
                    config.languagetool_url = languagetool_url;
                }
                if embeddings_url.is_some() {
                    config.embeddings_url = embeddings_url;
                }
                Backends::from_config(config)
            };
            score(transcript.load()?, backends, json, csv, report).await
        }
        Commands::Analyze {
            transcript,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(&transcript.load()?);
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn score(
    transcript: Transcript,
    backends: Backends,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    let engine = RubricEngine::new(backends);
    let result = engine.score(&transcript).await;

    if let Some(path) = json {
        write_json(&result, &path)?;
        info!("JSON written to {:?}", path);
    }
    if let Some(path) = csv {
        write_csv_file(&result, &path)?;
        info!("CSV written to {:?}", path);
    }

    let formatted = ScoreReport::new(&result);
    if let Some(path) = report {
        formatted.write_file(&path)?;
        info!("Report written to {:?}", path);
    }
    print!("{}", formatted.format());

    Ok(())
}

fn analyze(transcript: &Transcript) {
    let text = transcript.text();
    let words = word_count(text);
    let filler = filler_rate(text);

    println!("Transcript Analysis");
    println!("===================");
    println!("Words: {}", words);
    println!("Unique words: {}", unique_word_count(text));
    println!("Sentences: {}", sentence_count(text));
    println!(
        "Type-token ratio: {}",
        display_float(round_to(type_token_ratio(text), 3))
    );
    println!(
        "Filler words: {} ({}%)",
        filler.count,
        display_float(round_to(filler.percent, 2))
    );
    println!(
        "Words per minute: {}",
        display_float(round_to(
            words_per_minute(words, transcript.duration_seconds()),
            1
        ))
    );
    println!();

    println!("Flow Markers");
    println!("------------");
    for (stage, offset) in stage_offsets(text) {
        match offset {
            Some(offset) => println!("{:?}: offset {}", stage, offset),
            None => println!("{:?}: not found", stage),
        }
    }
    println!();

    let found = detect_keywords(text, &CANONICAL_KEYWORDS);
    println!("Keywords ({} / {})", found.len(), CANONICAL_KEYWORDS.len());
    println!("--------");
    println!("{}", found.join(", "));
}
