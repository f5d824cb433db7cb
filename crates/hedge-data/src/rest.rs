//! REST provider client
//!
//! Thin client for a financial-datasets REST API: daily prices, financial
//! metrics, reported line items, insider trades, and market cap. Requests
//! authenticate with an `X-API-KEY` header.

use crate::dates::DateWindow;
use crate::error::{DataError, Result};
use crate::source::DataSource;
use async_trait::async_trait;
use hedge_core::{
    FinancialLineItem, FinancialMetrics, InsiderTrade, MarketSnapshot, PriceBar, SentimentInput,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

const DEFAULT_API_BASE: &str = "https://api.financialdatasets.ai";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the financial-datasets REST API
pub struct RestClient {
    api_key: String,
    api_base: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: Vec<PriceBar>,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    #[serde(default)]
    financial_metrics: Vec<FinancialMetrics>,
}

#[derive(Debug, Deserialize)]
struct LineItemsResponse {
    #[serde(default)]
    search_results: Vec<FinancialLineItem>,
}

#[derive(Debug, Deserialize)]
struct InsiderTradesResponse {
    #[serde(default)]
    insider_trades: Vec<InsiderTrade>,
}

#[derive(Debug, Deserialize)]
struct CompanyFactsResponse {
    company_facts: Option<CompanyFacts>,
}

#[derive(Debug, Deserialize)]
struct CompanyFacts {
    market_cap: Option<f64>,
}

impl RestClient {
    /// Create a client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        })
    }

    /// Create a client from the `FINANCIAL_DATASETS_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FINANCIAL_DATASETS_API_KEY").map_err(|_| {
            DataError::DataUnavailable(
                "FINANCIAL_DATASETS_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    /// Override the API base URL (useful for test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("X-API-KEY", &self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Provider {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch daily price bars for the window
    #[instrument(skip(self))]
    pub async fn get_prices(&self, ticker: &str, window: DateWindow) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/prices/?ticker={ticker}&interval=day&interval_multiplier=1&start_date={}&end_date={}",
            self.api_base, window.start, window.end
        );
        let response: PricesResponse = self.get_json(&url).await?;
        if response.prices.is_empty() {
            return Err(DataError::DataUnavailable(format!("prices for {ticker}")));
        }
        Ok(response.prices)
    }

    /// Fetch the latest trailing-twelve-month financial metrics
    #[instrument(skip(self))]
    pub async fn get_financial_metrics(
        &self,
        ticker: &str,
        report_period: &str,
    ) -> Result<Vec<FinancialMetrics>> {
        let url = format!(
            "{}/financial-metrics/?ticker={ticker}&report_period_lte={report_period}&limit=1&period=ttm",
            self.api_base
        );
        let response: MetricsResponse = self.get_json(&url).await?;
        if response.financial_metrics.is_empty() {
            return Err(DataError::DataUnavailable(format!(
                "financial metrics for {ticker}"
            )));
        }
        Ok(response.financial_metrics)
    }

    /// Search reported line items (free cash flow and friends)
    #[instrument(skip(self))]
    pub async fn search_line_items(
        &self,
        ticker: &str,
        line_items: &[&str],
    ) -> Result<Vec<FinancialLineItem>> {
        let url = format!("{}/financials/search/line-items", self.api_base);
        let body = json!({
            "tickers": [ticker],
            "line_items": line_items,
            "period": "ttm",
            "limit": 1,
        });
        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Provider {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let parsed: LineItemsResponse = response.json().await?;
        Ok(parsed.search_results)
    }

    /// Fetch recent insider trades filed before the end date
    #[instrument(skip(self))]
    pub async fn get_insider_trades(
        &self,
        ticker: &str,
        end_date: &str,
        limit: u32,
    ) -> Result<Vec<InsiderTrade>> {
        let url = format!(
            "{}/insider-trades/?ticker={ticker}&filing_date_lte={end_date}&limit={limit}",
            self.api_base
        );
        let response: InsiderTradesResponse = self.get_json(&url).await?;
        Ok(response.insider_trades)
    }

    /// Fetch the company's market capitalization
    #[instrument(skip(self))]
    pub async fn get_market_cap(&self, ticker: &str) -> Result<f64> {
        let url = format!("{}/company/facts?ticker={ticker}", self.api_base);
        let response: CompanyFactsResponse = self.get_json(&url).await?;
        response
            .company_facts
            .and_then(|facts| facts.market_cap)
            .ok_or_else(|| DataError::DataUnavailable(format!("market cap for {ticker}")))
    }
}

/// Data source that assembles snapshots from the REST provider
///
/// The provider carries no sentiment feed, so snapshots from this source
/// use a neutral sentiment input.
pub struct RestDataSource {
    client: RestClient,
}

impl RestDataSource {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for RestDataSource {
    async fn fetch_snapshot(&self, ticker: &str, window: DateWindow) -> Result<MarketSnapshot> {
        let end = window.end.to_string();
        let mut prices = self.client.get_prices(ticker, window).await?;
        prices.sort_by_key(|bar| bar.date);
        let financial_metrics = self.client.get_financial_metrics(ticker, &end).await?;
        let financial_line_items = self
            .client
            .search_line_items(ticker, &["free_cash_flow"])
            .await
            .unwrap_or_default();
        let insider_trades = self
            .client
            .get_insider_trades(ticker, &end, 5)
            .await
            .unwrap_or_default();
        let market_cap = self.client.get_market_cap(ticker).await?;

        let snapshot = MarketSnapshot {
            ticker: ticker.to_string(),
            start_date: window.start,
            end_date: window.end,
            prices,
            financial_metrics,
            financial_line_items,
            insider_trades,
            market_cap,
            sentiment: SentimentInput::default(),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}
