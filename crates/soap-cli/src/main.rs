//! CLI binary for serving and exercising the SOAP note pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use soap_llm::{resolve_model, Credentials, GatewayConfig, ModelRegistry, ProviderGateway};
use soap_pipeline::{FallbackPolicy, NoteSource, SoapGenerator};
use soap_types::SoapError;

#[derive(Parser)]
#[command(name = "soapgen", version, about = "Generate SOAP clinical notes from doctor's notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Directory of static files served on every other path
        #[arg(long, env = "STATIC_DIR")]
        static_dir: Option<PathBuf>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Generate a note for a JSON request body and print it
    Generate {
        /// Path to the request body (.json)
        input: PathBuf,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Print the offline rule-based note for a JSON request body
    Fallback {
        /// Path to the request body (.json)
        input: PathBuf,
    },

    /// Print the prompt that would be sent for a JSON request body
    Prompt {
        /// Path to the request body (.json)
        input: PathBuf,
    },

    /// Show which provider and model id a label resolves to
    Resolve {
        /// Model label, e.g. "gemini 2.5 flash"
        label: String,
    },
}

#[derive(Args)]
struct GatewayArgs {
    /// Deadline for each provider attempt, in seconds
    #[arg(long, env = "SOAP_TIMEOUT_SECS", default_value = "60")]
    timeout_secs: u64,

    /// Retries after the first attempt, for transient provider failures
    #[arg(long, env = "SOAP_MAX_RETRIES", default_value = "2")]
    max_retries: usize,

    /// Return the offline rule-based note when the provider is unavailable
    #[arg(long, env = "SOAP_FALLBACK")]
    fallback: bool,
}

impl GatewayArgs {
    fn generator(&self) -> anyhow::Result<SoapGenerator> {
        let config = GatewayConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            ..Default::default()
        };
        let gateway = ProviderGateway::new(&config).context("failed to build provider gateway")?;
        let credentials = Credentials::from_env();
        tracing::debug!(?credentials, "Loaded provider credentials");

        let policy = if self.fallback {
            FallbackPolicy::OnUnavailable
        } else {
            FallbackPolicy::Disabled
        };
        Ok(SoapGenerator::new(Arc::new(gateway), credentials).with_fallback(policy))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            gateway,
        } => {
            cmd_serve(&host, port, static_dir.as_deref(), &gateway).await?;
        }
        Commands::Generate { input, gateway } => {
            cmd_generate(&input, &gateway).await?;
        }
        Commands::Fallback { input } => {
            let body = load_body(&input)?;
            println!("{}", soap_pipeline::fallback(&soap_pipeline::normalize(&body)));
        }
        Commands::Prompt { input } => {
            let body = load_body(&input)?;
            println!("{}", soap_pipeline::build_prompt(&soap_pipeline::normalize(&body)));
        }
        Commands::Resolve { label } => {
            let resolution = resolve_model(&label);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            if !resolution.is_known() {
                eprintln!("Unknown model label. Known labels:");
                for (label, known) in ModelRegistry::builtin().labels() {
                    eprintln!("  {label} -> {} {}", known.provider, known.canonical_model_id);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_body(path: &Path) -> anyhow::Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let body = serde_json::from_str(&source)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(body)
}

async fn cmd_serve(
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    gateway: &GatewayArgs,
) -> anyhow::Result<()> {
    let generator = gateway.generator()?;
    let creds = generator.credentials();
    for provider in soap_types::Provider::CALLABLE {
        if !creds.has(provider) {
            tracing::warn!(
                %provider,
                "No API key configured; requests for its models will be rejected"
            );
        }
    }

    let app = soap_server::router(soap_server::AppState::new(generator), static_dir);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "Server listening");
    soap_server::serve(listener, app).await?;
    Ok(())
}

async fn cmd_generate(input: &Path, gateway: &GatewayArgs) -> anyhow::Result<()> {
    let body = load_body(input)?;
    let generator = gateway.generator()?;

    match generator.generate(&body).await {
        Ok(generation) => {
            if let NoteSource::Provider { provider, model } = &generation.source {
                tracing::info!(%provider, %model, "Note generated");
            }
            match &generation.soap {
                Value::String(text) => println!("{text}"),
                other => println!("{}", serde_json::to_string_pretty(other)?),
            }
            Ok(())
        }
        Err(SoapError::Validation(report)) => {
            for issue in &report.issues {
                println!("[ERROR] {}: {}", issue.field, issue.message);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
