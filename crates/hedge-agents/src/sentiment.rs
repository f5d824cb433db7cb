//! Sentiment scoring stage
//!
//! Merges three sentiment inputs - the reported overall mood, recent news
//! classified by impact, and analyst rating counts - into one opinion.
//! Directional calls carry a 75% confidence floor; a neutral call is
//! always exactly 50%.

use crate::stage::ScoringStage;
use async_trait::async_trait;
use hedge_core::{
    AgentOpinion, AnalystRatings, Confidence, MarketSnapshot, NewsImpact, NewsItem,
    SentimentLabel, Signal, StageId,
};
use tracing::debug;

/// Buy/sell ratio assumed when no analyst ratings were reported
const DEFAULT_RATING_RATIO: f64 = 0.33;

/// Ratio threshold above which analyst consensus reinforces the news tilt
const DECISIVE_RATIO: f64 = 0.6;

/// Minimum confidence attached to a directional sentiment call
const DIRECTIONAL_FLOOR: f64 = 0.75;

/// Sentiment scoring stage
#[derive(Debug, Default)]
pub struct SentimentAnalyst;

impl SentimentAnalyst {
    pub fn new() -> Self {
        Self
    }

    /// Count news items leaning bullish or bearish
    ///
    /// A headline counts for a side when its impact classification says so
    /// or its summary literally mentions the side.
    fn news_tally(news: &[NewsItem]) -> (usize, usize) {
        let bullish = news
            .iter()
            .filter(|item| {
                matches!(item.impact, NewsImpact::VeryPositive | NewsImpact::Positive)
                    || item.summary.to_lowercase().contains("bullish")
            })
            .count();
        let bearish = news
            .iter()
            .filter(|item| {
                matches!(item.impact, NewsImpact::VeryNegative | NewsImpact::Negative)
                    || item.summary.to_lowercase().contains("bearish")
            })
            .count();
        (bullish, bearish)
    }

    /// Buy and sell ratios from the rating counts
    fn rating_ratios(ratings: &AnalystRatings) -> (f64, f64) {
        let total = ratings.total();
        if total == 0 {
            return (DEFAULT_RATING_RATIO, DEFAULT_RATING_RATIO);
        }
        let total = f64::from(total);
        let buy = f64::from(ratings.strong_buy + ratings.buy) / total;
        let sell = f64::from(ratings.strong_sell + ratings.sell) / total;
        (buy, sell)
    }
}

#[async_trait]
impl ScoringStage for SentimentAnalyst {
    fn id(&self) -> StageId {
        StageId::Sentiment
    }

    async fn evaluate(&self, snapshot: &MarketSnapshot) -> AgentOpinion {
        let input = &snapshot.sentiment;
        let reported = input.confidence.min(1.0);

        let (bullish_news, bearish_news) = Self::news_tally(&input.recent_news);
        let (buy_ratio, sell_ratio) = Self::rating_ratios(&input.analyst_ratings);

        let (signal, confidence) = if matches!(
            input.overall_sentiment,
            SentimentLabel::VeryBullish | SentimentLabel::Bullish
        ) || (bullish_news > bearish_news && buy_ratio > DECISIVE_RATIO)
        {
            (Signal::Bullish, reported.max(DIRECTIONAL_FLOOR))
        } else if matches!(
            input.overall_sentiment,
            SentimentLabel::VeryBearish | SentimentLabel::Bearish
        ) || (bearish_news > bullish_news && sell_ratio > DECISIVE_RATIO)
        {
            (Signal::Bearish, reported.max(DIRECTIONAL_FLOOR))
        } else {
            (Signal::Neutral, 0.5)
        };

        let ratings = &input.analyst_ratings;
        let mut reasoning = format!(
            "Market Sentiment: {} | News Analysis: {bullish_news} bullish, {bearish_news} bearish | \
             Analyst Ratings: Buy={}, Hold={}, Sell={}",
            input.overall_sentiment.as_str(),
            ratings.strong_buy + ratings.buy,
            ratings.hold,
            ratings.strong_sell + ratings.sell,
        );
        if !input.upcoming_events.is_empty() {
            let top: Vec<&str> = input
                .upcoming_events
                .iter()
                .take(2)
                .map(String::as_str)
                .collect();
            reasoning.push_str(&format!(" | Upcoming Events: {}", top.join(", ")));
        }

        debug!(signal = %signal, confidence, "sentiment inputs merged");
        AgentOpinion::new(
            StageId::Sentiment,
            signal,
            Confidence::from_fraction(confidence),
            reasoning,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_core::{FinancialMetrics, SentimentInput};

    fn snapshot_with(sentiment: SentimentInput) -> MarketSnapshot {
        MarketSnapshot {
            ticker: "TEST".to_string(),
            start_date: "2024-01-01".parse().unwrap(),
            end_date: "2024-03-01".parse().unwrap(),
            prices: Vec::new(),
            financial_metrics: vec![FinancialMetrics::default()],
            financial_line_items: Vec::new(),
            insider_trades: Vec::new(),
            market_cap: 1.0e12,
            sentiment,
        }
    }

    fn news(summary: &str, impact: NewsImpact) -> NewsItem {
        NewsItem {
            summary: summary.to_string(),
            impact,
        }
    }

    #[tokio::test]
    async fn test_reported_bullish_mood_gets_confidence_floor() {
        let sentiment = SentimentInput {
            overall_sentiment: SentimentLabel::VeryBullish,
            confidence: 0.3,
            ..SentimentInput::default()
        };
        let opinion = SentimentAnalyst::new().evaluate(&snapshot_with(sentiment)).await;
        assert_eq!(opinion.signal, Signal::Bullish);
        assert_eq!(opinion.confidence.value(), 0.75);
    }

    #[tokio::test]
    async fn test_high_reported_confidence_survives_floor() {
        let sentiment = SentimentInput {
            overall_sentiment: SentimentLabel::Bearish,
            confidence: 0.9,
            ..SentimentInput::default()
        };
        let opinion = SentimentAnalyst::new().evaluate(&snapshot_with(sentiment)).await;
        assert_eq!(opinion.signal, Signal::Bearish);
        assert_eq!(opinion.confidence.value(), 0.9);
    }

    #[tokio::test]
    async fn test_neutral_mood_flipped_by_news_and_ratings() {
        let sentiment = SentimentInput {
            overall_sentiment: SentimentLabel::Neutral,
            confidence: 0.4,
            recent_news: vec![
                news("Earnings beat expectations", NewsImpact::VeryPositive),
                news("Product recall announced", NewsImpact::Negative),
                news("Analysts turn bullish on the stock", NewsImpact::Neutral),
            ],
            analyst_ratings: AnalystRatings {
                strong_buy: 10,
                buy: 8,
                hold: 5,
                sell: 1,
                strong_sell: 0,
            },
            ..SentimentInput::default()
        };
        // 2 bullish vs 1 bearish headlines and buy ratio 18/24 = 0.75
        let opinion = SentimentAnalyst::new().evaluate(&snapshot_with(sentiment)).await;
        assert_eq!(opinion.signal, Signal::Bullish);
        assert_eq!(opinion.confidence.value(), 0.75);
    }

    #[tokio::test]
    async fn test_neutral_is_exactly_half_confidence() {
        let sentiment = SentimentInput {
            confidence: 0.95,
            ..SentimentInput::default()
        };
        let opinion = SentimentAnalyst::new().evaluate(&snapshot_with(sentiment)).await;
        assert_eq!(opinion.signal, Signal::Neutral);
        assert_eq!(opinion.confidence.value(), 0.5);
    }

    #[tokio::test]
    async fn test_no_ratings_uses_default_ratio() {
        let (buy, sell) = SentimentAnalyst::rating_ratios(&AnalystRatings::default());
        assert_eq!(buy, DEFAULT_RATING_RATIO);
        assert_eq!(sell, DEFAULT_RATING_RATIO);
    }

    #[tokio::test]
    async fn test_reasoning_lists_top_two_events() {
        let sentiment = SentimentInput {
            upcoming_events: vec![
                "Earnings call".to_string(),
                "Product launch".to_string(),
                "Shareholder meeting".to_string(),
            ],
            ..SentimentInput::default()
        };
        let opinion = SentimentAnalyst::new().evaluate(&snapshot_with(sentiment)).await;
        assert!(opinion
            .reasoning
            .ends_with("Upcoming Events: Earnings call, Product launch"));
        assert!(!opinion.reasoning.contains("Shareholder meeting"));
    }
}
