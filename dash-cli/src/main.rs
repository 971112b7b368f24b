//! dash-cli - batch helpers for the arrivals and exchange-rate dashboard.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dash-cli",
    version,
    about = "Arrivals and USD/LBP exchange-rate dashboard data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: dash_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    dash_cmd::run(cli.command)
}
