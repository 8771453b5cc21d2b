//! Recommender - single entry point for a free-text symptom query
//!
//! Resolves the symptom name, runs both rankings and attaches explanations.
//! The result is plain data; formatting lives in `explanation::formatters`.
//!
//! Outcomes:
//! - `SymptomNotFound`: no symptom matches the name (expected, not an error)
//! - `Found` with an empty list and/or no availability pick: the symptom
//!   exists but has no effect data
//! - `Err(StoreError)`: only for store failures

use crate::config::DEFAULT_LIMIT;
use crate::explanation::{AvailabilityExplanation, ExplanationGenerator, TherapeuticExplanation};
use crate::models::SymptomMatch;
use crate::ranking::{RankingEngine, ScoredHerb};
use crate::store::{HerbStore, StoreError};
use serde::{Deserialize, Serialize};

/// Ranked herb with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub scored: ScoredHerb,
    pub explanation: TherapeuticExplanation,
}

/// Most accessible herb with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecommendation {
    pub scored: ScoredHerb,
    pub explanation: AvailabilityExplanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub symptom: SymptomMatch,
    pub therapeutic: Vec<RankedRecommendation>,
    pub availability: Option<AvailabilityRecommendation>,
}

impl RecommendationBundle {
    pub fn has_potency_data(&self) -> bool {
        !self.therapeutic.is_empty()
    }

    pub fn has_availability_data(&self) -> bool {
        self.availability.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    SymptomNotFound { query: String },
    Found(RecommendationBundle),
}

impl Recommendation {
    pub fn not_found_message(query: &str) -> String {
        format!("No symptom found matching: {}", query)
    }
}

pub struct Recommender<S> {
    engine: RankingEngine<S>,
    limit: usize,
}

impl<S: HerbStore> Recommender<S> {
    pub fn new(store: S, limit: usize) -> Self {
        Self {
            engine: RankingEngine::new(store),
            limit,
        }
    }

    pub fn with_default_limit(store: S) -> Self {
        Self::new(store, DEFAULT_LIMIT)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn recommend(&self, symptom_text: &str) -> Result<Recommendation, StoreError> {
        let query = symptom_text.trim();

        let Some(symptom) = self.engine.store().find_symptom_by_name(query)? else {
            tracing::info!("No symptom matching '{}'", query);
            return Ok(Recommendation::SymptomNotFound { query: query.to_string() });
        };

        let therapeutic = self
            .engine
            .top_herbs_for_symptom(symptom.symptom_id, self.limit)?
            .into_iter()
            .enumerate()
            .map(|(idx, scored)| {
                let explanation = ExplanationGenerator::therapeutic(idx + 1, &scored, &symptom.name);
                RankedRecommendation { scored, explanation }
            })
            .collect::<Vec<_>>();

        let availability = self
            .engine
            .most_available_herb_for_symptom(symptom.symptom_id)?
            .map(|scored| {
                let explanation = ExplanationGenerator::availability(&scored);
                AvailabilityRecommendation { scored, explanation }
            });

        tracing::info!(
            "Symptom '{}' (id {}): {} therapeutic option(s), availability pick: {}",
            symptom.name,
            symptom.symptom_id,
            therapeutic.len(),
            availability.is_some(),
        );

        Ok(Recommendation::Found(RecommendationBundle {
            symptom,
            therapeutic,
            availability,
        }))
    }
}
