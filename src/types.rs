// =============================================================================
// Shared types used across the Finance Agent
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
///
/// Bars inside a series are unique by `date` and sorted ascending. The usual
/// `low <= min(open, close) <= max(open, close) <= high` relation is trusted,
/// not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl PricePoint {
    /// `true` when all four prices are usable numbers. Volume is never
    /// considered.
    pub fn is_complete(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Categorical trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "STRONG_BUY")]
    StrongBuy,
    #[serde(rename = "GRADUAL_BUY")]
    GradualBuy,
    #[serde(rename = "HOLD/WATCH")]
    HoldWatch,
    #[serde(rename = "WEAK_OUTLOOK")]
    WeakOutlook,
    #[serde(rename = "STRONG_SELL")]
    StrongSell,
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData,
}

/// Display colouring / sorting hint for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Bullish,
    Bearish,
    Neutral,
}

impl Decision {
    pub fn stance(self) -> Stance {
        match self {
            Self::StrongBuy | Self::GradualBuy => Stance::Bullish,
            Self::StrongSell | Self::WeakOutlook => Stance::Bearish,
            Self::HoldWatch | Self::InsufficientData => Stance::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::GradualBuy => "GRADUAL_BUY",
            Self::HoldWatch => "HOLD/WATCH",
            Self::WeakOutlook => "WEAK_OUTLOOK",
            Self::StrongSell => "STRONG_SELL",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk bucket derived from annualised volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Trend-strength label attached to each decision category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Neutral,
    Weak,
    Weakening,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "Strong"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Weak => write!(f, "Weak"),
            Self::Weakening => write!(f, "Weakening"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_serialises_to_wire_labels() {
        assert_eq!(serde_json::to_string(&Decision::HoldWatch).unwrap(), "\"HOLD/WATCH\"");
        assert_eq!(
            serde_json::to_string(&Decision::InsufficientData).unwrap(),
            "\"INSUFFICIENT_DATA\""
        );
        let parsed: Decision = serde_json::from_str("\"GRADUAL_BUY\"").unwrap();
        assert_eq!(parsed, Decision::GradualBuy);
    }

    #[test]
    fn decision_display_matches_serde() {
        for d in [
            Decision::StrongBuy,
            Decision::GradualBuy,
            Decision::HoldWatch,
            Decision::WeakOutlook,
            Decision::StrongSell,
            Decision::InsufficientData,
        ] {
            let json = serde_json::to_string(&d).unwrap();
            assert_eq!(json, format!("\"{d}\""));
        }
    }

    #[test]
    fn stance_groups_categories() {
        assert_eq!(Decision::StrongBuy.stance(), Stance::Bullish);
        assert_eq!(Decision::GradualBuy.stance(), Stance::Bullish);
        assert_eq!(Decision::WeakOutlook.stance(), Stance::Bearish);
        assert_eq!(Decision::StrongSell.stance(), Stance::Bearish);
        assert_eq!(Decision::HoldWatch.stance(), Stance::Neutral);
        assert_eq!(Decision::InsufficientData.stance(), Stance::Neutral);
    }

    #[test]
    fn incomplete_point_detected() {
        let mut p = PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 0,
        };
        assert!(p.is_complete());
        p.low = f64::NAN;
        assert!(!p.is_complete());
    }
}
