// =============================================================================
// Analysis Result — Output record of a single-symbol analysis
// =============================================================================
//
// Every field is always populated with a concrete value, including in the
// insufficient-data sentinel, so report layers never have to handle gaps.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::market_data::HistoryPeriod;
use crate::signals::SignalVote;
use crate::types::{Decision, RiskLevel, TrendStrength};

/// Minimum number of rows required before a decision is attempted.
pub const MIN_OBSERVATIONS: usize = 50;

/// Decision engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Latest close.
    pub last_price: f64,

    /// First-to-last close change over the whole window, in percent.
    pub change_pct: f64,

    /// Latest RSI reading.
    pub rsi: f64,

    /// Annualised volatility, in percent.
    pub volatility: f64,

    pub decision: Decision,

    /// Generated rationale.
    pub comment: String,

    pub risk_level: RiskLevel,

    pub trend_strength: TrendStrength,

    /// Conviction in [30, 95]; 0.0 only for the insufficient-data sentinel.
    pub confidence: f64,

    /// Integer score the decision was mapped from.
    pub score: i32,

    /// Contributing rule votes, in evaluation order.
    pub signals: Vec<SignalVote>,
}

impl AnalysisResult {
    /// The fixed result returned when fewer than [`MIN_OBSERVATIONS`] rows are
    /// available.
    pub fn insufficient_data(volatility: f64) -> Self {
        Self {
            last_price: 0.0,
            change_pct: 0.0,
            rsi: 50.0,
            volatility,
            decision: Decision::InsufficientData,
            comment: format!(
                "Not enough price history: at least {MIN_OBSERVATIONS} observations are required for analysis."
            ),
            risk_level: RiskLevel::High,
            trend_strength: TrendStrength::Weak,
            confidence: 0.0,
            score: 0,
            signals: Vec::new(),
        }
    }
}

/// An analysis bundled with where its data came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub period: HistoryPeriod,
    /// `true` when the synthetic fallback series was analysed.
    pub is_demo: bool,
    /// Number of bars the analysis was run on.
    pub observations: usize,
    pub generated_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
}
