//! Historical backtest over a manual dataset

use anyhow::Context;
use chrono::{Days, Local};
use clap::Args;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use hedge_agents::Pipeline;
use hedge_backtest::{Backtester, PerformanceReport};
use hedge_data::{DateWindow, ManualDataSource, ManualDataset, dates::parse_date};
use hedge_llm::GeminiProvider;
use std::sync::Arc;

/// Calendar days of history backtested when no start date is given
const DEFAULT_WINDOW_DAYS: u64 = 90;

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Stock ticker symbol (e.g., AAPL)
    #[arg(long)]
    pub ticker: String,

    /// Start date in YYYY-MM-DD format. Defaults to 90 days before end date
    #[arg(long = "start_date")]
    pub start_date: Option<String>,

    /// End date in YYYY-MM-DD format. Defaults to today
    #[arg(long = "end_date")]
    pub end_date: Option<String>,

    /// Initial capital amount
    #[arg(long = "initial_capital", default_value_t = 100_000.0)]
    pub initial_capital: f64,

    /// Path to JSON file containing manual financial data
    #[arg(long = "manual_data", required = true)]
    pub manual_data: String,
}

pub async fn run(args: BacktestArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let end = args
        .end_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("end date must be in YYYY-MM-DD format")?
        .unwrap_or(today);
    let start = args
        .start_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("start date must be in YYYY-MM-DD format")?
        .unwrap_or_else(|| {
            end.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(end)
        });
    let window = DateWindow::new(start, end)?;

    let dataset = ManualDataset::from_file(&args.manual_data)?;
    let source = Arc::new(ManualDataSource::new(dataset));
    let provider = Arc::new(GeminiProvider::from_env()?);
    let pipeline = Pipeline::new(source.clone(), provider);

    let backtester = Backtester::new(
        pipeline,
        source,
        args.ticker.clone(),
        window,
        args.initial_capital,
    );

    println!("\nStarting backtest...");
    let result = backtester.run().await?;

    let Some(report) = PerformanceReport::from_equity_curve(result.initial_capital, &result.equity_curve)
    else {
        println!("No portfolio values to analyze");
        return Ok(());
    };

    println!("\nPerformance Metrics:");
    println!("{}", performance_table(&report));
    Ok(())
}

fn performance_table(report: &PerformanceReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table
        .add_row(vec![
            Cell::new("Total Return"),
            Cell::new(format!("{:.2}%", report.total_return * 100.0)),
        ])
        .add_row(vec![
            Cell::new("Annualized Return"),
            Cell::new(format!("{:.2}%", report.annualized_return * 100.0)),
        ])
        .add_row(vec![
            Cell::new("Annualized Volatility"),
            Cell::new(format!("{:.2}%", report.annualized_volatility * 100.0)),
        ])
        .add_row(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(format!("{:.2}", report.sharpe_ratio)),
        ])
        .add_row(vec![
            Cell::new("Maximum Drawdown"),
            Cell::new(format!("{:.2}%", report.max_drawdown * 100.0)),
        ]);
    table
}
