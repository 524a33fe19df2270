// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based signal voting used by the decision engine.

pub mod score_card;

pub use score_card::{ScoreCard, SignalSnapshot, SignalVote};
