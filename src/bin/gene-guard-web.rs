// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! gene-guard web service
//!
//! Accepts annotated VCF uploads, extracts the notable variants and returns a
//! narrative risk report from the configured generative-language model.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;

use gene_guard::service::{create_app, AppState, ServiceConfig};

#[derive(Parser)]
#[command(name = "gene-guard-web")]
#[command(about = "VCF prioritization and narrative risk report web service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web service
    Serve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/service.toml")]
        config: PathBuf,

        /// Override host address
        #[arg(long)]
        host: Option<String>,

        /// Override port
        #[arg(short, long)]
        port: Option<u16>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long, default_value = "info")]
        log_level: String,
    },

    /// Generate a sample configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/service.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Check configuration, prompt template and API key
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "config/service.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_level,
        } => serve_command(config, host, port, log_level).await,
        Commands::Config { output, force } => config_command(output, force),
        Commands::Check { config } => check_command(config),
    }
}

async fn serve_command(
    config_path: PathBuf,
    host_override: Option<String>,
    port_override: Option<u16>,
    log_level: String,
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&log_level)?;

    info!("Starting gene-guard web service");

    let mut config = load_or_default_config(&config_path)?;

    if let Some(host) = host_override {
        config.server.host = host;
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e.into());
    }

    info!("Configuration loaded successfully");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let state = AppState::from_config(config)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("gene-guard web service running on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn config_command(output_path: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output_path.exists() && !force {
        eprintln!(
            "Configuration file already exists: {}",
            output_path.display()
        );
        eprintln!("Use --force to overwrite");
        std::process::exit(1);
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    ServiceConfig::default().to_file(&output_path)?;

    println!(
        "Sample configuration file created: {}",
        output_path.display()
    );
    println!("Set GEMINI_API_KEY and point prompt.template_path at your template");

    Ok(())
}

fn check_command(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking configuration...");

    let config = load_or_default_config(&config_path)?;

    match config.validate() {
        Ok(()) => println!("Configuration is valid"),
        Err(e) => {
            println!("Configuration validation failed: {}", e);
            return Err(e.into());
        }
    }

    match AppState::from_config(config) {
        Ok(state) => {
            println!("  OK prompt template: {} bytes", state.template.as_str().len());
            println!("  OK narrative generator: {}", state.narrative.name());
        }
        Err(e) => {
            println!("  ERROR {}", e);
            return Err(e.into());
        }
    }

    println!("\nCheck completed");
    Ok(())
}

fn load_or_default_config(config_path: &Path) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    if config_path.exists() {
        info!("Loading configuration from {}", config_path.display());
        ServiceConfig::from_file(config_path)
    } else {
        info!("Configuration file not found, using defaults");
        println!(
            "WARNING: Configuration file not found: {}",
            config_path.display()
        );
        println!("TIP: Run 'gene-guard-web config' to generate a sample configuration file");
        Ok(ServiceConfig::default())
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    info!("Tracing initialized with level: {}", level);

    Ok(())
}
