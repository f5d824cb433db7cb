//! Interactive single-ticker analysis

use crate::report;
use anyhow::{Context, bail};
use chrono::Local;
use clap::Args;
use hedge_agents::Pipeline;
use hedge_core::Portfolio;
use hedge_data::{DateWindow, ManualDataSource, MarketResearcher, dates::parse_date};
use hedge_llm::GeminiProvider;
use hedge_utils::AppConfig;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Show reasoning from each agent
    #[arg(long)]
    pub show_reasoning: bool,

    /// Start date (YYYY-MM-DD). Defaults to 3 months before end date
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    pub end_date: Option<String>,
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    if config.gemini_api_key.is_none() {
        eprintln!("Error: GOOGLE_GEMINI_API_KEY environment variable not set!");
        eprintln!("Add your Gemini API key to the environment:");
        eprintln!("  GOOGLE_GEMINI_API_KEY=your-api-key-here");
        eprintln!("Get an API key from: https://ai.google.dev/");
        bail!("missing GOOGLE_GEMINI_API_KEY");
    }

    let start_date = args
        .start_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("start date must be in YYYY-MM-DD format")?;
    let end_date = args
        .end_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("end date must be in YYYY-MM-DD format")?;

    let provider = Arc::new(GeminiProvider::from_env()?);
    let researcher = MarketResearcher::new(provider.clone());
    let today = Local::now().date_naive();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let (ticker, dataset) = loop {
        let ticker = prompt(&mut lines, "\nEnter stock ticker symbol (e.g., AAPL): ")?;
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            println!("Ticker symbol cannot be empty. Please try again.");
            continue;
        }

        println!("\nFetching market data for {ticker}...");
        match researcher.gather(&ticker, today).await {
            Ok(dataset) => {
                println!("Successfully fetched stock data!");
                break (ticker, dataset);
            }
            Err(err) => {
                eprintln!("Failed to gather data for {ticker}: {err}");
                let retry = prompt(&mut lines, "\nWould you like to try another ticker? (y/n): ")?;
                if retry.trim().to_lowercase() != "y" {
                    println!("Exiting program.");
                    return Ok(());
                }
            }
        }
    };

    let window = DateWindow::resolve(start_date, end_date, today)?;
    let portfolio = Portfolio {
        cash: config.initial_cash,
        shares: config.initial_stock,
    };
    let show_reasoning = args.show_reasoning || config.show_reasoning;

    let source = Arc::new(ManualDataSource::new(dataset));
    let pipeline = Pipeline::new(source, provider).with_show_reasoning(show_reasoning);

    info!(ticker, start = %window.start, end = %window.end, "running analysis");
    let outcome = pipeline.run(&ticker, window, &portfolio).await?;

    report::print_summary(&outcome, show_reasoning);
    let path = report::save_report(&outcome)?;
    println!("\nFull analysis saved to: {}", path.display());
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    message: &str,
) -> anyhow::Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("stdin closed"),
    }
}
