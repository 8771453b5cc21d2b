use crate::explanation::types::ToxicityWarning;
use crate::recommender::{
    AvailabilityRecommendation, RankedRecommendation, Recommendation, RecommendationBundle,
};

pub const NO_POTENCY_DATA: &str = "No potency data found for this symptom.";
pub const NO_AVAILABILITY_DATA: &str = "No availability data found.";
pub const DISCLAIMER: [&str; 2] = [
    "⚠️ This is an educational tool only, not medical advice.",
    "⚠️ Always consult a qualified healthcare professional before using herbs.",
];

/// Markdown formatter for recommendations (terminal-readable)
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn format(recommendation: &Recommendation) -> String {
        match recommendation {
            Recommendation::SymptomNotFound { query } => {
                format!("{}\n", Recommendation::not_found_message(query))
            }
            Recommendation::Found(bundle) => Self::format_bundle(bundle),
        }
    }

    fn format_bundle(bundle: &RecommendationBundle) -> String {
        let mut md = String::with_capacity(2048);

        md.push_str(&format!("# Symptom: {}\n\n", bundle.symptom.name));

        md.push_str("## Top therapeutic options\n\n");
        if bundle.therapeutic.is_empty() {
            md.push_str(&format!("{}\n\n", NO_POTENCY_DATA));
        }
        for ranked in &bundle.therapeutic {
            Self::format_ranked(&mut md, ranked);
        }

        md.push_str("## Most common / readily available option\n\n");
        match &bundle.availability {
            Some(pick) => Self::format_availability(&mut md, pick),
            None => md.push_str(&format!("{}\n\n", NO_AVAILABILITY_DATA)),
        }

        for line in DISCLAIMER {
            md.push_str(&format!("{}  \n", line));
        }

        md
    }

    fn format_ranked(md: &mut String, ranked: &RankedRecommendation) {
        let herb = &ranked.scored.herb;
        let effect = &ranked.scored.effect;
        let explanation = &ranked.explanation;

        md.push_str(&format!(
            "### #{}: {} (*{}*)\n\n",
            explanation.rank, herb.common_name, herb.latin_name
        ));
        md.push_str(&format!(
            "Potency score: {}, Evidence: {}  \n",
            effect.potency_score, effect.evidence_level
        ));
        md.push_str(&format!(
            "Combined therapeutic score: {:.2}  \n",
            ranked.scored.therapeutic_score
        ));
        if let Some(warning) = &explanation.toxicity_warning {
            Self::format_warning(md, warning);
        }

        md.push_str("\n**Explanation:**\n\n");
        md.push_str(&format!("- {}\n", explanation.usage));
        md.push_str(&format!("- {}\n", explanation.rank_justification));
        md.push_str(&format!("- {}\n\n", explanation.tier_message));
    }

    fn format_availability(md: &mut String, pick: &AvailabilityRecommendation) {
        let herb = &pick.scored.herb;
        let explanation = &pick.explanation;

        md.push_str(&format!("**{}** (*{}*)  \n", herb.common_name, herb.latin_name));
        md.push_str(&format!("Availability score: {}  \n", herb.availability_score));
        md.push_str(&format!("Popularity score: {}  \n", herb.popularity_score));
        md.push_str(&format!("Cost score (lower is cheaper): {}  \n", herb.cost_score));
        md.push_str(&format!(
            "Combined availability rank: {:.2}  \n",
            pick.scored.availability_rank
        ));
        if let Some(warning) = &explanation.toxicity_warning {
            Self::format_warning(md, warning);
        }

        md.push_str("\n**Explanation:**\n\n");
        md.push_str(&format!("- {}\n", explanation.summary));
        md.push_str(&format!("- {}\n", explanation.accessibility));
        if let Some(affordability) = &explanation.affordability {
            md.push_str(&format!("- {}\n", affordability));
        }
        if let Some(warning) = &explanation.toxicity_warning {
            md.push_str(&format!("- {}\n", warning.message));
        }
        md.push('\n');
    }

    fn format_warning(md: &mut String, warning: &ToxicityWarning) {
        md.push_str(&format!("⚠ Toxicity level: {}  \n", warning.level));
        if let Some(notes) = &warning.notes {
            md.push_str(&format!("⚠ Notes: {}  \n", notes));
        }
    }
}
