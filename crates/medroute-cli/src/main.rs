//! MedRoute CLI
//!
//! Classifies a patient message and prints where it should be routed.
//! The backend is a construction-time choice; the classify call itself is
//! identical across all four strategies.

use anyhow::Result;
use clap::Parser;
use medroute_classifiers::{BackendKind, MessageClassifier, RouterConfig};
use medroute_core::{Classification, Error};
use std::io::Read;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "medroute")]
#[command(about = "Route patient messages to the right care team", long_about = None)]
struct Cli {
    /// Patient message to classify; read from stdin when omitted
    message: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "medroute.yaml")]
    config: String,

    /// Classification backend: remote, local, supervised, or zero-shot
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Model identifier override
    #[arg(short, long, env = "MEDROUTE_MODEL")]
    model: Option<String>,

    /// Endpoint base URL override (remote and local backends)
    #[arg(long, env = "MEDROUTE_BASE_URL")]
    base_url: Option<String>,

    /// API key for the remote backend
    #[arg(long, env = "MEDROUTE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Emit the classification as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration, then apply CLI overrides
    let mut config = RouterConfig::from_file(&cli.config)?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url.clone();
    }
    if cli.api_key.is_some() {
        config.api_key = cli.api_key.clone();
    }

    let message = match &cli.message {
        Some(message) => message.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    info!(backend = %config.backend, "initializing classifier");
    let classifier = MessageClassifier::from_config(&config)?;

    match classifier.classify(&message).await {
        Ok(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render(&result);
            }
            Ok(())
        }
        Err(Error::Validation(reason)) => {
            eprintln!("invalid input: {reason}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("classification failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Human-readable rendering of a classification
fn render(result: &Classification) {
    println!("{}", result.routing_message);
    println!();
    println!("Category:   {}", result.category.replace('_', " "));
    println!("Confidence: {}", result.confidence);
    if !result.reasoning.is_empty() {
        println!("Reasoning:  {}", result.reasoning);
    }
    if let Some(scores) = &result.scores {
        println!();
        println!("Scores:");
        for (label, score) in scores {
            println!("  {:<20} {score:.3}", label.replace('_', " "));
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
