//! Turns a rainfall probability into what the operator sees.

use serde::Serialize;
use utoipa::ToSchema;

/// Probability above which rain is considered likely.
const HIGH_RISK_THRESHOLD: f64 = 0.8;

/// Probability above which rain is considered possible.
const MODERATE_RISK_THRESHOLD: f64 = 0.5;

/// Advisory tier for a rainfall probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    /// Tier for `p`; boundaries belong to the lower tier.
    pub fn from_probability(p: f64) -> Self {
        if p > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if p > MODERATE_RISK_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskTier::High => "⚠️ High chance of rain: bring an umbrella!",
            RiskTier::Moderate => "🌥️ Moderate chance: be prepared!",
            RiskTier::Low => "🌤️ Low chance of rain: you're probably safe.",
        }
    }

    /// Banner style: the high tier is highlighted, the others are informational.
    pub fn style(self) -> &'static str {
        match self {
            RiskTier::High => "success",
            RiskTier::Moderate | RiskTier::Low => "info",
        }
    }
}

/// Output block for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Presentation {
    /// Probability formatted as a percentage with one decimal (e.g. "42.3%")
    pub percentage: String,
    /// Progress bar fill in [0, 1]
    pub progress: f64,
    /// Advisory tier
    pub tier: RiskTier,
    /// Advisory message for the tier
    pub message: String,
    /// Banner style ("success" or "info")
    pub style: String,
}

/// Format `p` as a percentage with one decimal place, without clamping.
pub fn format_percentage(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Build the output block for a rainfall probability.
///
/// Total over any input: the percentage shows the raw value while the
/// progress fill is clamped to [0, 1].
pub fn present(p: f64) -> Presentation {
    let tier = RiskTier::from_probability(p);
    Presentation {
        percentage: format_percentage(p),
        progress: p.clamp(0.0, 1.0),
        tier,
        message: tier.message().to_string(),
        style: tier.style().to_string(),
    }
}
