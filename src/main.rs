//! Cohort Payback CLI
//!
//! Computes cohort payback curves and ROI from exported metric rows
//! and writes them as a JSON report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use cohort_payback::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};

/// Cohort Payback - payback curves and ROI for acquisition cohorts
#[derive(Parser, Debug)]
#[command(name = "cohort-payback")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze cohort rows and write a payback report
    Analyze {
        /// JSON file with metric rows (array, or object with a `records` array)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "artifacts/payback.json")]
        output: PathBuf,

        /// Print the JSON report to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// TOML configuration file
        #[arg(short, long, env = "COHORT_PAYBACK_CONFIG")]
        config: Option<PathBuf>,

        /// First cohort key to include (e.g. 2023-01)
        #[arg(long)]
        from: Option<String>,

        /// Last cohort key to include (e.g. 2023-12)
        #[arg(long)]
        to: Option<String>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Timeline rows shown in the summary
        #[arg(long)]
        summary_rows: Option<usize>,
    },

    /// Validate a payback report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            stdout,
            config,
            from,
            to,
            summary,
            summary_rows,
        } => {
            let args = AnalyzeArgs {
                input,
                output: if stdout { None } else { Some(output) },
                config,
                from,
                to,
                print_summary: summary,
                summary_rows,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
