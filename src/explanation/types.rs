use serde::{Deserialize, Serialize};
use crate::models::ToxicityLevel;

/// Why a herb holds its place in the therapeutic ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapeuticExplanation {
    /// 1-based position in the ranked list
    pub rank: usize,
    pub usage: String,              // "Commonly used for Insomnia."
    pub rank_justification: String, // "Ranks #1 based on potency (0.9) and evidence (0.5)."
    pub tier: RecommendationTier,
    pub tier_message: String,
    pub toxicity_warning: Option<ToxicityWarning>,
}

/// Why a herb was picked as the most accessible option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityExplanation {
    pub summary: String,
    pub accessibility: String,
    /// Present only for cheap herbs
    pub affordability: Option<String>,
    pub toxicity_warning: Option<ToxicityWarning>,
}

/// Position-dependent qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Primary,
    Alternative,
}

impl RecommendationTier {
    pub fn from_rank(rank: usize) -> Self {
        if rank == 1 {
            RecommendationTier::Primary
        } else {
            RecommendationTier::Alternative
        }
    }
}

/// Warning block for herbs whose toxicity is not low
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityWarning {
    pub level: ToxicityLevel,
    /// `None` when the herb has no notes
    pub notes: Option<String>,
    pub message: String,
}
