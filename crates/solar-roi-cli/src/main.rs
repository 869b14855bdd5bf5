mod commands;
mod config;
mod input;
mod output;
mod webhook;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::lead::LeadArgs;
use commands::roi::RoiArgs;

/// Residential solar return-on-investment projections
#[derive(Parser)]
#[command(
    name = "solar-roi",
    version,
    about = "Residential solar return-on-investment projections",
    long_about = "A CLI for projecting the payback of a residential solar installation \
                  with decimal precision: system sizing, federal tax credit, loan \
                  financing, year-by-year savings, break-even and carbon offset. \
                  Leads can be validated and delivered to an intake webhook."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter directive, e.g. "info" or "solar_roi_core=debug"
    #[arg(long, default_value = "warn", global = true, env = "SOLAR_ROI_LOG")]
    log_level: String,

    /// Path to .solar-roi.toml (searched upward from the working directory otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project savings, payback and ROI for a solar installation
    Roi(RoiArgs),
    /// Validate a lead, project it and deliver it to intake
    Lead(LeadArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Roi(args) => {
            commands::roi::run_roi(args).map(|value| output::format_output(&cli.output, &value))
        }
        Commands::Lead(args) => {
            let config = config::load_config(cli.config.as_deref());
            commands::lead::prepare_lead(args, &config).map(|lead| {
                lead.emit_then_deliver(|value| output::format_output(&cli.output, value));
            })
        }
        Commands::Version => {
            println!("solar-roi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
