//! Analysis report rendering
//!
//! Renders one [`AnalysisOutcome`] as the console summary and as a
//! timestamped text report under `outputs/`.

use chrono::Local;
use hedge_agents::AnalysisOutcome;
use hedge_core::TradeAction;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Position size rendered as a percentage, capped at 100
fn position_size_percent(outcome: &AnalysisOutcome) -> f64 {
    (outcome.risk.position_size.unwrap_or(0.0) * 100.0).min(100.0)
}

/// Render the full report text written to the output file
pub fn render_report(outcome: &AnalysisOutcome, timestamp: &str) -> String {
    let decision = &outcome.decision;
    let position_size = position_size_percent(outcome);
    let mut out = String::new();

    let _ = writeln!(out, "=== Investment Analysis Report for {} ===", outcome.ticker);
    let _ = writeln!(out, "Generated on: {timestamp}\n");

    let _ = writeln!(out, "=== OVERALL DECISION ===");
    let _ = writeln!(out, "DECISION: {}", decision.action.to_string().to_uppercase());
    let _ = writeln!(out, "CONFIDENCE: {}", decision.confidence);
    if matches!(decision.action, TradeAction::Buy | TradeAction::Sell) {
        let _ = writeln!(out, "QUANTITY: {}", decision.quantity);
    }
    let _ = writeln!(out, "POSITION SIZE: {position_size:.1}%\n");

    let _ = writeln!(out, "SUPPORTING SIGNALS:");
    let _ = writeln!(
        out,
        "- Technical: {} ({})",
        outcome.technical.signal, outcome.technical.confidence
    );
    let _ = writeln!(
        out,
        "- Fundamental: {} ({})",
        outcome.fundamental.signal, outcome.fundamental.confidence
    );
    let _ = writeln!(
        out,
        "- Sentiment: {} ({})",
        outcome.sentiment.signal, outcome.sentiment.confidence
    );
    let _ = writeln!(
        out,
        "- Risk Level: {} ({})\n",
        outcome.risk.signal, outcome.risk.confidence
    );

    let _ = writeln!(out, "REASONING:");
    let _ = writeln!(out, "{}\n", decision.reasoning);

    let _ = writeln!(out, "=== DETAILED ANALYSIS ===\n");

    let _ = writeln!(out, "Technical Analysis:");
    let _ = writeln!(out, "Signal: {}", outcome.technical.signal);
    let _ = writeln!(out, "Confidence: {}", outcome.technical.confidence);
    let _ = writeln!(out, "Reasoning: {}\n", outcome.technical.reasoning);

    let _ = writeln!(out, "Fundamental Analysis:");
    let _ = writeln!(out, "Signal: {}", outcome.fundamental.signal);
    let _ = writeln!(out, "Confidence: {}", outcome.fundamental.confidence);
    let _ = writeln!(out, "Reasoning: {}\n", outcome.fundamental.reasoning);

    let _ = writeln!(out, "Sentiment Analysis:");
    let _ = writeln!(out, "Signal: {}", outcome.sentiment.signal);
    let _ = writeln!(out, "Confidence: {}", outcome.sentiment.confidence);
    let _ = writeln!(out, "Reasoning: {}\n", outcome.sentiment.reasoning);

    let _ = writeln!(out, "Risk Assessment:");
    let _ = writeln!(out, "Risk Signal: {}", outcome.risk.signal);
    let _ = writeln!(out, "Risk Confidence: {}", outcome.risk.confidence);
    let _ = writeln!(out, "Position Size: {position_size:.1}%");
    let _ = writeln!(out, "Reasoning: {}\n", outcome.risk.reasoning);

    let _ = writeln!(out, "Portfolio Management Details:");
    let _ = writeln!(out, "Action: {}", decision.action);
    let _ = writeln!(out, "Quantity: {}", decision.quantity);
    let _ = writeln!(out, "Confidence: {}", decision.confidence);
    let _ = writeln!(out, "Reasoning: {}", decision.reasoning);

    out
}

/// Write the report to `outputs/{ticker}_analysis_{timestamp}.txt`
pub fn save_report(outcome: &AnalysisOutcome) -> anyhow::Result<PathBuf> {
    let output_dir = PathBuf::from("outputs");
    std::fs::create_dir_all(&output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = output_dir.join(format!("{}_analysis_{timestamp}.txt", outcome.ticker));
    std::fs::write(&path, render_report(outcome, &timestamp))?;
    Ok(path)
}

/// Print the console summary after an analysis run
pub fn print_summary(outcome: &AnalysisOutcome, show_reasoning: bool) {
    let decision = &outcome.decision;
    let position_size = position_size_percent(outcome);

    println!("\n=== INVESTMENT ANALYSIS SUMMARY ===");
    println!("Ticker: {}", outcome.ticker);
    println!("Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    println!("\n=== OVERALL DECISION ===");
    println!("DECISION: {}", decision.action.to_string().to_uppercase());
    println!("CONFIDENCE: {}", decision.confidence);
    if matches!(decision.action, TradeAction::Buy | TradeAction::Sell) {
        println!("QUANTITY: {}", decision.quantity);
    }
    println!("POSITION SIZE: {position_size:.1}%");

    println!("\nSUPPORTING SIGNALS:");
    println!(
        "- Technical: {} ({})",
        outcome.technical.signal, outcome.technical.confidence
    );
    println!(
        "- Fundamental: {} ({})",
        outcome.fundamental.signal, outcome.fundamental.confidence
    );
    println!(
        "- Sentiment: {} ({})",
        outcome.sentiment.signal, outcome.sentiment.confidence
    );
    println!(
        "- Risk Level: {} ({})",
        outcome.risk.signal, outcome.risk.confidence
    );

    println!("\nREASONING:");
    println!("{}", decision.reasoning);

    if show_reasoning {
        println!("\n=== DETAILED ANALYSIS ===");
        for (title, opinion) in [
            ("Technical Analysis", &outcome.technical),
            ("Fundamental Analysis", &outcome.fundamental),
            ("Sentiment Analysis", &outcome.sentiment),
            ("Risk Assessment", &outcome.risk),
        ] {
            println!("\n{title}:");
            println!("Signal: {}", opinion.signal);
            println!("Confidence: {}", opinion.confidence);
            if opinion.position_size.is_some() {
                println!("Position Size: {position_size:.1}%");
            }
            println!("Reasoning: {}", opinion.reasoning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_core::{
        AgentOpinion, Confidence, Signal, StageId, TradingDecision,
    };

    fn outcome() -> AnalysisOutcome {
        let opinion = |stage, signal, conf: f64| {
            AgentOpinion::new(stage, signal, Confidence::from_fraction(conf), "because")
        };
        AnalysisOutcome {
            ticker: "AAPL".to_string(),
            technical: opinion(StageId::Technical, Signal::Bullish, 0.667),
            fundamental: opinion(StageId::Fundamental, Signal::Bullish, 1.0),
            sentiment: opinion(StageId::Sentiment, Signal::Neutral, 0.5),
            risk: opinion(StageId::Risk, Signal::Bullish, 0.95).with_position_size(1.0),
            decision: TradingDecision {
                action: TradeAction::Buy,
                quantity: 42,
                confidence: Confidence::from_fraction(0.85),
                reasoning: "Fundamentals dominate".to_string(),
                agent_signals: Vec::new(),
            },
        }
    }

    #[test]
    fn test_report_sections_and_order() {
        let text = render_report(&outcome(), "20240620_120000");
        let header = text.find("=== Investment Analysis Report for AAPL ===").unwrap();
        let overall = text.find("=== OVERALL DECISION ===").unwrap();
        let signals = text.find("SUPPORTING SIGNALS:").unwrap();
        let detailed = text.find("=== DETAILED ANALYSIS ===").unwrap();
        assert!(header < overall && overall < signals && signals < detailed);
    }

    #[test]
    fn test_buy_decision_includes_quantity() {
        let text = render_report(&outcome(), "20240620_120000");
        assert!(text.contains("DECISION: BUY"));
        assert!(text.contains("QUANTITY: 42"));
        assert!(text.contains("CONFIDENCE: 85.0%"));
        assert!(text.contains("POSITION SIZE: 100.0%"));
    }

    #[test]
    fn test_hold_decision_omits_quantity() {
        let mut outcome = outcome();
        outcome.decision.action = TradeAction::Hold;
        let text = render_report(&outcome, "20240620_120000");
        assert!(text.contains("DECISION: HOLD"));
        assert!(!text.contains("QUANTITY: 42"));
        // The details section still lists the quantity field
        assert!(text.contains("Quantity: 42"));
    }

    #[test]
    fn test_position_size_capped_at_100() {
        let mut outcome = outcome();
        outcome.risk.position_size = Some(1.5);
        let text = render_report(&outcome, "20240620_120000");
        assert!(text.contains("POSITION SIZE: 100.0%"));
    }
}
