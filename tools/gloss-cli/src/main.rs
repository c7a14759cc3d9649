use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gloss_candidates::{CandidateFilter, RawCandidate};
use gloss_pipeline::{Pipeline, PipelineConfig};
use gloss_protocol::{ParsedSentence, ValidationMode};
use gloss_validator::{validate_contract, validate_frozen_structure};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Annotates parsed sentences and checks annotation documents")]
struct Cli {
    /// Log debug output (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build, enrich and validate documents from parser output.
    Annotate {
        /// A list of parsed sentences, or a list of such lists (one per document).
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Check a document against the contract, and optionally its skeleton.
    Validate {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        skeleton: Option<PathBuf>,

        #[arg(short, long, default_value = "v2_strict")]
        mode: ValidationMode,
    },
    /// Normalize a list of rejected candidates.
    Candidates {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Sentence the candidates were generated for; enables the echo filter.
        #[arg(short, long)]
        sentence: Option<String>,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// A single document, or a batch of them. `[]` is an empty document.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParseInput {
    Single(Vec<ParsedSentence>),
    Batch(Vec<Vec<ParsedSentence>>),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            println!("Written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => read_json(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn annotate(input: &Path, output: Option<&Path>, config: Option<&Path>) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(load_config(config)?)?;
    match read_json::<ParseInput>(input)? {
        ParseInput::Single(parses) => {
            let annotated = pipeline.annotate(&parses)?;
            eprintln!(
                "Annotated {} sentences, {} nodes ({} via backoff)",
                annotated.summary.sentences, annotated.summary.nodes, annotated.summary.backoff_nodes
            );
            write_json(&annotated.document, output)
        }
        ParseInput::Batch(batches) => {
            let mut documents = Vec::with_capacity(batches.len());
            for (i, result) in pipeline.annotate_batch(&batches).into_iter().enumerate() {
                let annotated = result.with_context(|| format!("document {i}"))?;
                documents.push(annotated.document);
            }
            eprintln!("Annotated {} documents", documents.len());
            write_json(&documents, output)
        }
    }
}

fn validate(input: &Path, skeleton: Option<&Path>, mode: ValidationMode) -> anyhow::Result<()> {
    let document: Value = read_json(input)?;
    let mut issues = validate_contract(&document, mode);
    if let Some(skeleton) = skeleton {
        let skeleton: Value = read_json(skeleton)?;
        issues.extend(validate_frozen_structure(&skeleton, &document));
    }
    if issues.is_empty() {
        println!("{} is valid ({})", input.display(), mode.as_str());
        return Ok(());
    }
    for issue in &issues {
        println!("{issue}");
    }
    bail!("{} issues in {}", issues.len(), input.display())
}

fn candidates(input: &Path, sentence: Option<&str>, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let filter = CandidateFilter::new(&config.candidate_policy)?;
    let raw: Vec<RawCandidate> = read_json(input)?;
    write_json(&filter.normalize(&raw, sentence), None)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Command::Annotate { input, output, config } => annotate(input, output.as_deref(), config.as_deref()),
        Command::Validate { input, skeleton, mode } => validate(input, skeleton.as_deref(), *mode),
        Command::Candidates {
            input,
            sentence,
            config,
        } => candidates(input, sentence.as_deref(), config.as_deref()),
    }
}
