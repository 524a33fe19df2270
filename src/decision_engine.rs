// =============================================================================
// Decision Engine — Indicator frame => categorical recommendation
// =============================================================================
//
// Pipeline:
//   1. Fewer than 50 rows => fixed insufficient-data sentinel.
//   2. Read the latest row, coercing missing readings to neutral defaults.
//   3. Score it with the rule card (signals::score_card).
//   4. Map the score to decision + trend strength, volatility to risk level.
//   5. Compose the rationale from the first three reasons.
//
// Score mapping (first match wins):
//   >= 3  STRONG_BUY    Strong
//   1..=2 GRADUAL_BUY   Moderate
//   <= -3 STRONG_SELL   Weakening
//   -2..=-1 WEAK_OUTLOOK Weak
//   0     HOLD/WATCH    Neutral
// =============================================================================

use tracing::debug;

use crate::analysis_result::{AnalysisResult, MIN_OBSERVATIONS};
use crate::indicator_engine::IndicatorFrame;
use crate::indicators::rsi::NEUTRAL_RSI;
use crate::signals::{ScoreCard, SignalSnapshot};
use crate::types::{Decision, RiskLevel, TrendStrength};

/// Volatility (annualised %) at or above which risk is High.
pub const HIGH_RISK_VOLATILITY: f64 = 38.0;
/// Volatility (annualised %) at or below which risk is Low.
pub const LOW_RISK_VOLATILITY: f64 = 20.0;

const MIN_CONFIDENCE: f64 = 30.0;
const MAX_CONFIDENCE: f64 = 95.0;

/// Number of reasons quoted in the rationale.
const LEADING_REASONS: usize = 3;

/// Turn an indicator frame and its volatility into a recommendation.
///
/// Never fails; short frames produce [`AnalysisResult::insufficient_data`].
pub fn decide(frame: &IndicatorFrame, volatility: f64) -> AnalysisResult {
    let volatility = safe_float(Some(volatility), 0.0);

    let (first, last) = match (frame.first(), frame.last()) {
        (Some(first), Some(last)) if frame.len() >= MIN_OBSERVATIONS => (first, last),
        _ => {
            debug!(rows = frame.len(), "decision skipped: insufficient history");
            return AnalysisResult::insufficient_data(volatility);
        }
    };

    let last_close = safe_float(Some(last.point.close), 0.0);
    let first_close = safe_float(Some(first.point.close), 0.0);

    let snap = SignalSnapshot {
        last_close,
        rsi: safe_float(Some(last.rsi), NEUTRAL_RSI),
        sma_short: safe_float(last.sma_short, last_close),
        sma_long: safe_float(last.sma_long, last_close),
        macd: safe_float(last.macd, 0.0),
        macd_signal: safe_float(last.macd_signal, 0.0),
        bb_upper: safe_float(last.bb_upper, last_close),
        bb_lower: safe_float(last.bb_lower, last_close),
    };

    let card = ScoreCard::evaluate(&snap);
    let (decision, trend_strength) = classify_score(card.score);

    let comment = compose_comment(card.score, &card.leading_reasons(LEADING_REASONS));

    debug!(
        score = card.score,
        decision = %decision,
        votes = card.votes.len(),
        "decision computed"
    );

    AnalysisResult {
        last_price: last_close,
        change_pct: percent_change(first_close, last_close),
        rsi: snap.rsi,
        volatility,
        decision,
        comment,
        risk_level: risk_level(volatility),
        trend_strength,
        confidence: confidence(card.score),
        score: card.score,
        signals: card.votes,
    }
}

/// Coerce a possibly-missing or non-finite reading to `default`.
pub fn safe_float(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Map a score to its decision category and trend-strength label.
pub fn classify_score(score: i32) -> (Decision, TrendStrength) {
    match score {
        s if s >= 3 => (Decision::StrongBuy, TrendStrength::Strong),
        1 | 2 => (Decision::GradualBuy, TrendStrength::Moderate),
        s if s <= -3 => (Decision::StrongSell, TrendStrength::Weakening),
        -1 | -2 => (Decision::WeakOutlook, TrendStrength::Weak),
        _ => (Decision::HoldWatch, TrendStrength::Neutral),
    }
}

/// `min(95, max(30, 50 + |score| * 10))`.
pub fn confidence(score: i32) -> f64 {
    (50.0 + f64::from(score.unsigned_abs()) * 10.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Risk bucket for an annualised volatility in percent.
pub fn risk_level(volatility: f64) -> RiskLevel {
    if volatility >= HIGH_RISK_VOLATILITY {
        RiskLevel::High
    } else if volatility <= LOW_RISK_VOLATILITY {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    safe_float(Some((to - from) / from * 100.0), 0.0)
}

fn compose_comment(score: i32, reasons: &[&str]) -> String {
    let leading = if reasons.is_empty() {
        "none".to_string()
    } else {
        reasons.join(", ")
    };
    format!("Decision score computed as {score}. Leading signals: {leading}.")
}
