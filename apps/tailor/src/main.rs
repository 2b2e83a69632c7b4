mod config;
mod errors;
mod input;
mod llm_client;
mod matching;
mod models;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EngineOptions};
use crate::llm_client::{LlmClient, TextGenerator, MODEL};
use crate::matching::pipeline::MatchPipeline;

/// Matches a job description against a project portfolio, ranks the
/// projects by relevance, and rewrites the strongest descriptions toward
/// the posting's vocabulary.
#[derive(Debug, Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    /// Job description text file.
    #[arg(long, default_value = "input/job_description.txt")]
    job: PathBuf,

    /// Portfolio JSON file (array of projects).
    #[arg(long, default_value = "input/projects.json")]
    projects: PathBuf,

    /// Controlled skill vocabulary JSON file.
    #[arg(long, default_value = "input/skills.json")]
    skills: PathBuf,

    /// Where the match report is written.
    #[arg(long, default_value = "output/report.json")]
    output: PathBuf,

    /// Optimize descriptions for only the K strongest projects.
    #[arg(long)]
    top_k: Option<usize>,

    /// Rewrite candidates requested per project description.
    #[arg(long, default_value_t = 3)]
    attempts: u32,

    /// Skip the generative service even when an API key is configured.
    #[arg(long)]
    offline: bool,

    /// Verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.rust_log.clone()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    let options = EngineOptions {
        top_k: cli.top_k,
        optimization_attempts: cli.attempts.max(1),
        ..EngineOptions::default()
    };

    let backend: Option<Arc<dyn TextGenerator>> = if cli.offline {
        info!("Offline mode: deterministic paths only");
        None
    } else if let Some(api_key) = config.anthropic_api_key.clone() {
        info!("Generative backend initialized (model: {MODEL})");
        Some(Arc::new(LlmClient::new(
            api_key,
            options.timeout,
            options.max_attempts,
        )))
    } else {
        info!("No ANTHROPIC_API_KEY set; deterministic paths only");
        None
    };

    let job_text = input::load_job_description(&cli.job)?;
    let projects = input::load_projects(&cli.projects)?;
    info!(
        "Loaded {} projects from {}",
        projects.len(),
        cli.projects.display()
    );

    let vocabulary = match input::load_vocabulary(&cli.skills) {
        Ok(vocabulary) => Some(vocabulary),
        Err(e) => {
            info!("No vocabulary loaded ({e:#}); relying on the generative path");
            None
        }
    };

    let pipeline = MatchPipeline::new(backend, vocabulary, options);
    match pipeline.run(&job_text, &projects).await {
        Ok(report) => {
            input::write_report(&cli.output, &report)?;
            info!(
                "Report written to {} ({} projects ranked, {} descriptions optimized)",
                cli.output.display(),
                report.ranked_projects.len(),
                report.optimized_descriptions.len()
            );
            Ok(())
        }
        Err(e) => {
            error!("Match run failed: {e}");
            input::write_error_report(&cli.output, &e.to_string())?;
            Err(e.into())
        }
    }
}
