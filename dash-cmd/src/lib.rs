//! Command implementations for the dashboard CLI.
//!
//! Provides the batch exchange-rate averaging used to produce the monthly
//! figures compiled into the dashboard, and a text summary of those figures.

use clap::Subcommand;
use std::path::PathBuf;

pub mod rates;
pub mod summary;

#[derive(Subcommand)]
pub enum Command {
    /// Average the daily market and Sayrafa USD/LBP CSVs into monthly rates
    MonthlyRates {
        /// Directory holding usd-to-lbp-market-rate.csv and the Sayrafa CSV
        #[arg(short = 'd', long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Print the summary card figures of the compiled dataset
    Summary {
        /// Only this phase (e.g. "phase2"); all phases and the combined view otherwise
        #[arg(short = 'p', long)]
        phase: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::MonthlyRates { data_dir } => rates::run_monthly_rates(&data_dir),
        Command::Summary { phase } => summary::run_summary(phase.as_deref()),
    }
}
