//! Command-line front end for the cvmatch screening pipeline.
//!
//! Stages CV PDFs into an upload directory, then answers hiring questions
//! over the staged batch, either one-shot (`ask`) or interactively
//! (`console`).
//!
//! Requires: `GOOGLE_API_KEY` environment variable.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cvmatch_core::{
    classify_question, CvMatcher, LopdfExtractor, MatchConfig, MatchReport, QuestionVerdict,
    UploadStore,
};
use cvmatch_gemini::{GeminiEmbeddings, GeminiGenerator};

/// How many excerpts to print per candidate before folding the rest.
const EXCERPTS_SHOWN: usize = 3;
/// Longest printed excerpt preview, in characters.
const PREVIEW_CHARS: usize = 160;

#[derive(Parser)]
#[command(name = "cvmatch")]
#[command(about = "Screen a batch of CV PDFs against hiring questions", long_about = None)]
#[command(version)]
struct Cli {
    /// Override the staging directory for uploaded CVs
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage CV PDFs for screening
    Add {
        /// PDF files to copy into the staging directory
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the staged CVs
    List,
    /// Remove staged CVs by file name
    Remove {
        /// Staged file names, as printed by `list`
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove every staged CV
    Clear,
    /// Answer one screening question over the staged batch
    Ask {
        /// The hiring question, e.g. "Which candidates know Rust?"
        question: String,
    },
    /// Interactive screening session over the staged batch
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = MatchConfig::from_env()?;
    if let Some(dir) = cli.uploads_dir {
        config.uploads_dir = dir;
    }

    match cli.command {
        Commands::Add { files } => run_add(&config, &files),
        Commands::List => run_list(&config),
        Commands::Remove { names } => run_remove(&config, &names),
        Commands::Clear => run_clear(&config),
        Commands::Ask { question } => run_ask(config, &question).await,
        Commands::Console => run_console(config).await,
    }
}

fn run_add(config: &MatchConfig, files: &[PathBuf]) -> Result<()> {
    let store = UploadStore::new(config.uploads_dir.clone());
    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", file.display()))?;
        let bytes =
            std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
        let staged = store.stage(name, &bytes)?;
        if staged.already_present {
            println!("skipped {} (already staged as {})", file.display(), staged.path.display());
        } else {
            println!("staged {}", staged.path.display());
        }
    }
    print_batch_status(config, store.list()?.len());
    Ok(())
}

fn run_list(config: &MatchConfig) -> Result<()> {
    let store = UploadStore::new(config.uploads_dir.clone());
    let staged = store.list()?;
    if staged.is_empty() {
        println!("no CVs staged under {}", store.dir().display());
        return Ok(());
    }
    for path in &staged {
        println!("{}", path.display());
    }
    print_batch_status(config, staged.len());
    Ok(())
}

fn run_remove(config: &MatchConfig, names: &[String]) -> Result<()> {
    let store = UploadStore::new(config.uploads_dir.clone());
    for name in names {
        if store.remove(name)? {
            println!("removed {name}");
        } else {
            println!("{name} was not staged");
        }
    }
    Ok(())
}

fn run_clear(config: &MatchConfig) -> Result<()> {
    let store = UploadStore::new(config.uploads_dir.clone());
    let removed = store.clear()?;
    println!("removed {removed} staged CV(s)");
    Ok(())
}

async fn run_ask(config: MatchConfig, question: &str) -> Result<()> {
    // Gate the question before spending any embedding calls on it.
    if let Some(reason) = rejection_reason(classify_question(question)) {
        println!("{reason}");
        return Ok(());
    }
    let matcher = build_matcher(config).await?;
    let report = matcher.find_matching_candidates(question).await?;
    print_report(&report);
    Ok(())
}

async fn run_console(config: MatchConfig) -> Result<()> {
    let matcher = build_matcher(config).await?;
    let mut editor = DefaultEditor::new()?;
    println!("Ask about the staged candidates. Ctrl-D exits.");
    loop {
        match editor.readline("cvmatch> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(question);
                if let Some(reason) = rejection_reason(classify_question(question)) {
                    println!("{reason}");
                    continue;
                }
                // One failed generation should not end the session.
                match matcher.find_matching_candidates(question).await {
                    Ok(report) => print_report(&report),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Build the screening pipeline over every staged CV.
async fn build_matcher(config: MatchConfig) -> Result<CvMatcher> {
    let store = UploadStore::new(config.uploads_dir.clone());
    let paths = store.list()?;
    if paths.is_empty() {
        bail!(
            "no CVs staged under {}; add some with `cvmatch add <files>`",
            store.dir().display()
        );
    }

    let embeddings = GeminiEmbeddings::from_env()?.with_model(&config.embedding_model);
    let generator = GeminiGenerator::from_env()?
        .with_model(&config.generative_model)
        .with_temperature(config.temperature);

    println!("Indexing {} CV(s)...", paths.len());
    let matcher = CvMatcher::builder()
        .config(config)
        .pdf_extractor(Arc::new(LopdfExtractor))
        .embeddings(Arc::new(embeddings))
        .generator(Arc::new(generator))
        .ingest(&paths)
        .await?;
    println!(
        "Indexed {} chunks for: {}",
        matcher.chunk_count(),
        matcher.candidates().join(", ")
    );
    Ok(matcher)
}

/// The message shown instead of an answer, or `None` for a relevant question.
fn rejection_reason(verdict: QuestionVerdict) -> Option<&'static str> {
    match verdict {
        QuestionVerdict::Relevant => None,
        QuestionVerdict::TooShort => {
            Some("That question is too short. Ask a fuller question about the candidates.")
        }
        QuestionVerdict::Injection => Some(
            "That looks like an attempt to change the analyst instructions. \
             Rephrase it as a question about the candidates.",
        ),
        QuestionVerdict::OffTopic => Some(
            "That question is outside CV screening. \
             Ask about skills, experience or qualifications instead.",
        ),
        QuestionVerdict::Ungrounded => Some(
            "It is unclear how that relates to the CVs. \
             Mention a skill, role or qualification you want to screen for.",
        ),
    }
}

fn print_report(report: &MatchReport) {
    println!("\n{}\n", report.narrative.text());
    // General answers carry no per-candidate evidence worth printing.
    if report.narrative.is_general() || report.ranking.is_empty() {
        return;
    }
    println!("Matched candidates:");
    for ranked in &report.ranking {
        let plural = if ranked.matches == 1 { "" } else { "s" };
        println!("  {} ({} matching excerpt{plural})", ranked.candidate_name, ranked.matches);
        if let Some(excerpts) = report.evidence_for(&ranked.candidate_name) {
            for excerpt in excerpts.iter().take(EXCERPTS_SHOWN) {
                println!("    - {}", preview(excerpt, PREVIEW_CHARS));
            }
            if excerpts.len() > EXCERPTS_SHOWN {
                println!("    ... and {} more", excerpts.len() - EXCERPTS_SHOWN);
            }
        }
    }
}

/// Flatten an excerpt to one line and cap it at `limit` characters.
fn preview(text: &str, limit: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= limit {
        return flattened;
    }
    let cut: String = flattened.chars().take(limit).collect();
    format!("{cut}...")
}
