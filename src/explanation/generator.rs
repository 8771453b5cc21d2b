use crate::explanation::types::*;
use crate::metrics::is_affordable;
use crate::models::Herb;
use crate::ranking::ScoredHerb;

/// Builds rank-aware explanations for ranked herbs
///
/// Which facts appear is fixed:
/// - therapeutic: usage, potency/evidence citation, primary vs alternative
/// - availability: availability/popularity citation, affordability remark
///   when cost is at or below the threshold
/// - both: a toxicity warning iff the herb's toxicity flag is set
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    /// Explanation for the herb at 1-based position `rank`
    pub fn therapeutic(rank: usize, scored: &ScoredHerb, symptom_name: &str) -> TherapeuticExplanation {
        let tier = RecommendationTier::from_rank(rank);
        let tier_message = match tier {
            RecommendationTier::Primary => "This is the primary / strongest recommendation.",
            RecommendationTier::Alternative => "This is a follow-up / alternative option.",
        };

        TherapeuticExplanation {
            rank,
            usage: format!("Commonly used for {}.", symptom_name),
            rank_justification: format!(
                "Ranks #{} based on potency ({}) and evidence ({}).",
                rank, scored.effect.potency_score, scored.effect.evidence_level
            ),
            tier,
            tier_message: tier_message.to_string(),
            toxicity_warning: Self::toxicity_warning(&scored.herb),
        }
    }

    /// Explanation for the most accessible herb
    pub fn availability(scored: &ScoredHerb) -> AvailabilityExplanation {
        let herb = &scored.herb;

        let affordability = is_affordable(herb.cost_score)
            .then(|| "It is also relatively affordable compared to other options.".to_string());

        AvailabilityExplanation {
            summary: "This herb is chosen as the most accessible option.".to_string(),
            accessibility: format!(
                "It scores well for availability ({}) and popularity ({}).",
                herb.availability_score, herb.popularity_score
            ),
            affordability,
            toxicity_warning: Self::toxicity_warning(herb),
        }
    }

    /// Warning block, only for flagged herbs
    pub fn toxicity_warning(herb: &Herb) -> Option<ToxicityWarning> {
        if !herb.toxicity_flag() {
            return None;
        }

        let notes = Some(herb.toxicity_notes.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let message = match &notes {
            Some(notes) => format!("Toxicity is {}: {}", herb.toxicity_level, notes),
            None => format!("Toxicity is {}.", herb.toxicity_level),
        };

        Some(ToxicityWarning {
            level: herb.toxicity_level,
            notes,
            message,
        })
    }
}
