//! Command-line interface for hedge-rs

mod commands;
mod report;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hedge")]
#[command(about = "Simulated multi-agent investment decision pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a ticker interactively and print the decision
    Analyze(commands::analyze::AnalyzeArgs),
    /// Replay the pipeline over a historical window
    Backtest(commands::backtest::BacktestArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    hedge_utils::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args).await,
        Commands::Backtest(args) => commands::backtest::run(args).await,
    }
}
