//! eco-nav: find green initiatives on a company website and ask a local
//! model about them.
//!
//! Logs go to stderr; stdout carries results and streamed answers.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use initiatives::{
    extract_initiatives, top_initiatives, DiscoverConfig, Ingestor, Initiative, InitiativeFinding,
};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser)]
#[command(name = "eco-nav")]
#[command(about = "Green-initiative discovery and local-model analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a website and rank its green initiatives
    Initiatives {
        url: String,
        /// Maximum pages to crawl
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Number of initiatives to show
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stream a reply from the local model
    Ask {
        prompt: String,
        #[arg(long)]
        model: Option<String>,
    },

    /// Ask the local model about a website
    Analyze {
        url: String,
        #[arg(long, default_value = "")]
        question: String,
        #[arg(long)]
        model: Option<String>,
        /// Crawl first and focus the question on the top initiative
        #[arg(long)]
        with_initiative: bool,
    },

    /// List installed models
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,initiatives=debug,ollama_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Initiatives {
            url,
            limit,
            top,
            json,
        } => {
            let ranked = find_initiatives(&config, &url, limit).await?;
            let shown = top_initiatives(&ranked, top);

            if json {
                let today = chrono::Local::now().date_naive();
                let findings: Vec<InitiativeFinding> =
                    shown.iter().map(|i| i.to_finding(today)).collect();
                println!("{}", serde_json::to_string_pretty(&findings)?);
            } else {
                print_initiatives(&url, shown, ranked.len());
            }
        }

        Commands::Ask { prompt, model } => {
            let client = config.ollama()?;
            let model = config.model(model.as_deref());
            tracing::info!(model = %model, "Asking model");

            client
                .generate_with(model, &prompt, print_fragment)
                .await
                .context("Generation failed")?;
            println!();
        }

        Commands::Analyze {
            url,
            question,
            model,
            with_initiative,
        } => {
            let client = config.ollama()?;
            let model = config.model(model.as_deref());

            let question = if with_initiative {
                let ranked = find_initiatives(&config, &url, 10).await?;
                match ranked.first() {
                    Some(top) => {
                        let finding = top.to_finding(chrono::Local::now().date_naive());
                        println!("{} {}\n", "Initiative:".bright_green().bold(), finding.project);
                        initiative_question(&finding, &question)
                    }
                    None => {
                        tracing::warn!(url = %url, "No initiatives found, analyzing site as a whole");
                        question
                    }
                }
            } else {
                question
            };

            tracing::info!(model = %model, url = %url, "Analyzing site");
            client
                .analyze_site(model, &url, &question, print_fragment)
                .await
                .context("Analysis failed")?;
            println!();
        }

        Commands::Models => {
            let client = config.ollama()?;
            for name in client.available_models_or_default().await {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Crawl `url` with Firecrawl and rank the paragraphs.
async fn find_initiatives(config: &Config, url: &str, limit: usize) -> Result<Vec<Initiative>> {
    let ingestor = config.firecrawl()?;
    let discover = DiscoverConfig::new(url).with_limit(limit);

    tracing::info!(url = %url, limit, ingestor = ingestor.name(), "Crawling website");
    let pages = ingestor
        .discover(&discover)
        .await
        .with_context(|| format!("Failed to crawl {}", url))?;

    let ranked = extract_initiatives(&pages, url);
    tracing::info!(pages = pages.len(), initiatives = ranked.len(), "Extraction complete");
    Ok(ranked)
}

fn print_fragment(fragment: &str) {
    let mut stdout = std::io::stdout().lock();
    // A closed stdout only loses output
    let _ = stdout.write_all(fragment.as_bytes());
    let _ = stdout.flush();
}

fn print_initiatives(url: &str, shown: &[Initiative], total: usize) {
    if shown.is_empty() {
        println!("{} {}", "No green initiatives found on".yellow(), url);
        return;
    }

    println!(
        "{} {} of {} for {}\n",
        "Top initiatives:".bright_green().bold(),
        shown.len(),
        total,
        url
    );
    for (rank, initiative) in shown.iter().enumerate() {
        let host = initiative.source_host().unwrap_or_else(|| initiative.url.clone());
        println!(
            "{:>2}. [{}] {}",
            rank + 1,
            initiative.score.to_string().bright_cyan(),
            host.dimmed()
        );
        println!("    {}\n", initiative.headline());
    }
}

/// Question focused on one initiative. A non-blank user question is kept
/// and scoped to the initiative.
fn initiative_question(finding: &InitiativeFinding, question: &str) -> String {
    let question = question.trim();
    if question.is_empty() {
        format!(
            "Tell me more about this initiative: \"{}\" What does it involve, and how credible are its sustainability claims?",
            finding.description
        )
    } else {
        format!("{} (regarding this initiative: \"{}\")", question, finding.description)
    }
}
