// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! gene-guard CLI
//!
//! Command-line access to variant extraction and prompt filling.

use clap::{Parser, Subcommand};
use gene_guard::prompt::{PromptTemplate, Subject};
use gene_guard::{extract_notable_variants, Extraction, ExtractionError, PrioritizeConfig};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gene-guard")]
#[command(author, version, about = "Annotated VCF variant prioritizer")]
#[command(
    long_about = "Pick the rare, high-quality, most damaging variants from an annotated VCF.

Examples:
  gene-guard extract -i sample.vcf
  gene-guard extract -i sample.vcf --format json --max-variants 10
  cat sample.vcf | gene-guard extract -i -
  gene-guard prompt -i sample.vcf --template prompt.txt --age 40 --gender male"
)]
struct Cli {
    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and rank notable variants
    Extract {
        /// Input VCF file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        #[command(flatten)]
        thresholds: Thresholds,
    },

    /// Print the prompt that would be sent to the narrative generator
    Prompt {
        /// Input VCF file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Prompt template file
        #[arg(short, long)]
        template: PathBuf,

        /// Subject age
        #[arg(long, default_value = "25")]
        age: u32,

        /// Subject gender
        #[arg(long, default_value = "female")]
        gender: String,

        #[command(flatten)]
        thresholds: Thresholds,
    },
}

#[derive(clap::Args)]
struct Thresholds {
    /// Minimum QUAL
    #[arg(long)]
    min_quality: Option<f64>,

    /// Maximum population allele frequency
    #[arg(long)]
    max_af: Option<f64>,

    /// Number of variants to report
    #[arg(long)]
    max_variants: Option<usize>,
}

impl Thresholds {
    fn to_config(&self) -> Result<PrioritizeConfig, Box<dyn std::error::Error>> {
        let mut config = PrioritizeConfig::default();
        if let Some(q) = self.min_quality {
            config = config.with_min_quality(q);
        }
        if let Some(af) = self.max_af {
            config = config.with_max_allele_frequency(af);
        }
        if let Some(n) = self.max_variants {
            config = config.with_max_variants(n);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Extract {
            input,
            format,
            thresholds,
        } => run_extract(&input, &format, &thresholds.to_config()?),
        Commands::Prompt {
            input,
            template,
            age,
            gender,
            thresholds,
        } => run_prompt(
            &input,
            &template,
            Subject { age, gender },
            &thresholds.to_config()?,
        ),
    }
}

fn run_extract(
    input: &Path,
    format: &str,
    config: &PrioritizeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = read_input(input)?;
    let extraction = match extract_notable_variants(&content, config) {
        Ok(extraction) => extraction,
        Err(e) => exit_with(&e),
    };

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if format == "json" {
        writeln!(writer, "{}", serde_json::to_string_pretty(&extraction)?)?;
    } else {
        write_text(&mut writer, &extraction)?;
    }
    Ok(())
}

fn run_prompt(
    input: &Path,
    template: &Path,
    subject: Subject,
    config: &PrioritizeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = PromptTemplate::from_file(template)?;
    let content = read_input(input)?;
    let extraction = match extract_notable_variants(&content, config) {
        Ok(extraction) => extraction,
        Err(e) => exit_with(&e),
    };

    println!("{}", template.fill(&subject, &extraction));
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, extraction: &Extraction) -> io::Result<()> {
    for (i, variant) in extraction.variants.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            variant.representation,
            variant.gene,
            variant.consequence,
            variant.impact,
            variant.quality
        )?;
    }
    writeln!(writer)?;
    if extraction.genes.is_empty() {
        writeln!(writer, "Genes: (none)")?;
    } else {
        writeln!(writer, "Genes: {}", extraction.genes.join(", "))?;
    }
    writeln!(writer, "Summary: {}", extraction.summary)
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(input)
    }
}

fn exit_with(error: &ExtractionError) -> ! {
    eprintln!("ERROR [{}]: {}", error.code(), error);
    std::process::exit(1);
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}
