// =============================================================================
// Score Card — Fixed-weight rule voting over the latest indicator row
// =============================================================================
//
// Rules (evaluated in this order, each at most one vote):
//   1. RSI extremes   — < 30 => +2, > 70 => -2
//   2. Trend stack    — close > sma_short > sma_long => +2, fully reversed => -2
//   3. MACD momentum  — macd > signal => +1, macd < signal => -1
//   4. Band position  — close < lower => +1, close > upper => -1
//
// A rule whose condition is not met casts no vote. The reasons are kept in
// evaluation order because the rationale quotes the first few verbatim.
// =============================================================================

use serde::{Deserialize, Serialize};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Latest-row readings, already coerced to plain numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSnapshot {
    pub last_close: f64,
    pub rsi: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
}

/// A single rule's contribution to the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalVote {
    pub name: String,
    pub weight: i32,
    pub reason: String,
}

impl SignalVote {
    fn new(name: &str, weight: i32, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            weight,
            reason: reason.to_string(),
        }
    }
}

/// Result of running every rule against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: i32,
    pub votes: Vec<SignalVote>,
}

impl ScoreCard {
    /// Evaluate all rules against `snap`.
    pub fn evaluate(snap: &SignalSnapshot) -> Self {
        let votes: Vec<SignalVote> = [
            rsi_vote(snap),
            trend_vote(snap),
            macd_vote(snap),
            band_vote(snap),
        ]
        .into_iter()
        .flatten()
        .collect();

        let score = votes.iter().map(|v| v.weight).sum();
        Self { score, votes }
    }

    /// Up to `n` reasons, in evaluation order.
    pub fn leading_reasons(&self, n: usize) -> Vec<&str> {
        self.votes.iter().take(n).map(|v| v.reason.as_str()).collect()
    }
}

// =============================================================================
// Rules
// =============================================================================

fn rsi_vote(s: &SignalSnapshot) -> Option<SignalVote> {
    if s.rsi < RSI_OVERSOLD {
        Some(SignalVote::new("rsi", 2, "RSI in oversold zone"))
    } else if s.rsi > RSI_OVERBOUGHT {
        Some(SignalVote::new("rsi", -2, "RSI in overbought zone"))
    } else {
        None
    }
}

/// Only a strict ordering counts; mixed stacks cast no vote.
fn trend_vote(s: &SignalSnapshot) -> Option<SignalVote> {
    if s.last_close > s.sma_short && s.sma_short > s.sma_long {
        Some(SignalVote::new("trend", 2, "price above short/medium averages"))
    } else if s.last_close < s.sma_short && s.sma_short < s.sma_long {
        Some(SignalVote::new("trend", -2, "price below short/medium averages"))
    } else {
        None
    }
}

/// An exact tie (flat market) is the only case without a vote.
fn macd_vote(s: &SignalSnapshot) -> Option<SignalVote> {
    if s.macd > s.macd_signal {
        Some(SignalVote::new("macd", 1, "MACD positive"))
    } else if s.macd < s.macd_signal {
        Some(SignalVote::new("macd", -1, "MACD momentum negative"))
    } else {
        None
    }
}

fn band_vote(s: &SignalSnapshot) -> Option<SignalVote> {
    if s.last_close < s.bb_lower {
        Some(SignalVote::new(
            "bollinger",
            1,
            "near lower Bollinger band (rebound potential)",
        ))
    } else if s.last_close > s.bb_upper {
        Some(SignalVote::new(
            "bollinger",
            -1,
            "at upper Bollinger band (pullback risk)",
        ))
    } else {
        None
    }
}
