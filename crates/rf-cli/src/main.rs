//! regexforge CLI
//!
//! Describe a pattern in natural language, have a local Ollama model draft
//! the regex, test patterns against sample text, and keep the good ones in
//! a small library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rf_ollama::OllamaClient;
use rf_store::PatternStore;
use rf_types::GenerationRequest;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "regexforge", version, about = "Natural-language regex workbench backed by a local model")]
struct Cli {
    /// Base URL of the Ollama server
    #[arg(long, default_value = "http://localhost:11434", global = true)]
    ollama_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a pattern from a natural-language description
    Generate {
        /// What the pattern should match
        description: String,
        /// Flag letters appended to the pattern
        #[arg(long, default_value = rf_types::DEFAULT_FLAGS)]
        flags: String,
        /// Model to ask
        #[arg(long, default_value = rf_types::DEFAULT_MODEL)]
        model: String,
        /// Save the generated pattern to the library under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Run a pattern against subject text and print the matches
    Test {
        /// Delimited pattern string, e.g. /\d+/g
        pattern: String,
        /// Subject text to scan
        subject: String,
    },
    /// Check whether the Ollama server is reachable
    Status,
    /// List saved patterns
    List {
        /// Only show patterns whose name, description, or tags match
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one saved pattern
    Show { id: String },
    /// Delete a saved pattern
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = OllamaClient::with_base_url(cli.ollama_url.clone());

    match cli.command {
        Command::Generate {
            description,
            flags,
            model,
            save,
        } => {
            let request = GenerationRequest::new(description.clone())
                .with_flags(flags)
                .with_model(model);
            debug!("Generating pattern for {:?}", request.description);

            let pattern = rf_pipeline::generate(&client, &request)
                .await
                .context("failed to generate a pattern")?;
            println!("{}", pattern);

            if let Some(name) = save {
                let mut store = PatternStore::open()?;
                let record = store.add(name, description, pattern, Vec::new())?;
                eprintln!("saved as {}", record.id);
            }
        }

        Command::Test { pattern, subject } => {
            let result = rf_pattern::test_pattern(&pattern, &subject);
            if !result.is_valid {
                eprintln!("invalid pattern: {}", pattern);
                std::process::exit(1);
            }
            if result.matches.is_empty() {
                println!("no matches");
            } else {
                for m in &result.matches {
                    println!("{}", m);
                }
            }
        }

        Command::Status => {
            let status = client.status().await;
            if status.is_running {
                println!(
                    "ollama is running at {} (version {})",
                    cli.ollama_url,
                    status.version.as_deref().unwrap_or("unknown")
                );
            } else {
                eprintln!(
                    "ollama is not reachable at {}: {}",
                    cli.ollama_url,
                    status.error.as_deref().unwrap_or("unknown error")
                );
                std::process::exit(1);
            }
        }

        Command::List { filter } => {
            let store = PatternStore::open()?;
            let patterns: Vec<_> = match filter {
                Some(query) => store.filter(&query),
                None => store.list().iter().collect(),
            };
            if patterns.is_empty() {
                println!("no saved patterns");
            }
            for p in patterns {
                println!("{}  {:20}  {}", p.id, p.name, p.pattern);
            }
        }

        Command::Show { id } => {
            let store = PatternStore::open()?;
            let p = store
                .get(&id)
                .with_context(|| format!("no pattern with id {}", id))?;
            println!("name:        {}", p.name);
            println!("description: {}", p.description);
            println!("pattern:     {}", p.pattern);
            println!("created:     {}", p.created_at.format("%b %e, %Y"));
            if !p.tags.is_empty() {
                println!("tags:        {}", p.tags.join(", "));
            }
        }

        Command::Delete { id } => {
            let mut store = PatternStore::open()?;
            store.remove(&id)?;
            println!("deleted {}", id);
        }
    }

    Ok(())
}
