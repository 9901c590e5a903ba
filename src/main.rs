use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analyzer;
mod config;
mod error;
mod git;
mod lint;
mod models;
mod report;
mod tools;
mod utils;

#[derive(Parser)]
#[command(name = "repohealth", about = "Scan a repository and score its health")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run code quality, security, testing, documentation, dependency and performance checks
    Analyze {
        /// Path to the repository to analyze
        repository: String,
        /// Output format: summary, json, or markdown
        #[arg(long, default_value = "summary", value_parser = ["summary", "json", "markdown", "md"])]
        format: String,
        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Analyzer config file (YAML, TOML or JSON)
        #[arg(long)]
        config: Option<String>,
    },
    /// Format and lint a single Python file
    Lint {
        /// Python file to lint and format
        file: String,
        /// Comma-separated lint codes to ignore (e.g. E501,W503)
        #[arg(long)]
        ignore: Option<String>,
        /// Where to save the corrected code (default: <stem>_fixed.py)
        #[arg(short, long)]
        output: Option<String>,
        /// Analyzer config file (YAML, TOML or JSON)
        #[arg(long)]
        config: Option<String>,
        /// Print the start of the formatted code
        #[arg(long)]
        preview: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            repository,
            format,
            output,
            config: config_path,
        } => {
            let config = config::resolve(config_path.as_deref())?;
            report::generate_report(
                &tools::ProcessRunner,
                &repository,
                config,
                &format,
                output.as_deref(),
            )?;
        }
        Commands::Lint {
            file,
            ignore,
            output,
            config: config_path,
            preview,
        } => {
            let config = config::resolve(config_path.as_deref())?;
            lint::run_lint(
                &tools::ProcessRunner,
                &config,
                &file,
                ignore.as_deref(),
                output.as_deref(),
                preview,
            )?;
        }
    }
    Ok(())
}
