//! Ranking Engine
//!
//! Selects every (herb, effect) candidate for a symptom, scores each with both
//! metrics and orders them for one of two independent questions:
//! - which herbs work best (therapeutic score, top N)
//! - which herb is easiest to obtain (availability rank, top 1)
//!
//! Ordering is a stable descending sort, so equal scores keep the store's
//! effect-row order and repeated calls on the same dataset return the same
//! list.

use crate::metrics::{availability_rank, therapeutic_score};
use crate::models::{Candidate, Effect, Herb, SymptomId};
use crate::store::{HerbStore, StoreError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Candidate with both scores attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHerb {
    pub herb: Herb,
    pub effect: Effect,
    pub therapeutic_score: f64,
    pub availability_rank: f64,
}

impl ScoredHerb {
    pub fn from_candidate(candidate: Candidate) -> Self {
        let therapeutic = therapeutic_score(
            candidate.effect.potency_score,
            candidate.effect.evidence_level,
        );
        let availability = availability_rank(
            candidate.herb.availability_score,
            candidate.herb.popularity_score,
            candidate.herb.cost_score,
        );

        Self {
            herb: candidate.herb,
            effect: candidate.effect,
            therapeutic_score: therapeutic,
            availability_rank: availability,
        }
    }
}

/// Ranking over an injected store handle
pub struct RankingEngine<S> {
    store: S,
}

impl<S: HerbStore> RankingEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Top `limit` herbs for the symptom by therapeutic score
    ///
    /// `symptom_id` must come from a prior lookup; an unknown id simply has
    /// no candidates. An empty result means "no potency data", not an error.
    pub fn top_herbs_for_symptom(
        &self,
        symptom_id: SymptomId,
        limit: usize,
    ) -> Result<Vec<ScoredHerb>, StoreError> {
        let mut scored = self.scored_candidates(symptom_id)?;

        scored.sort_by(|a, b| descending(a.therapeutic_score, b.therapeutic_score));
        scored.truncate(limit);

        Ok(scored)
    }

    /// Single most accessible herb for the symptom, or `None` without candidates
    pub fn most_available_herb_for_symptom(
        &self,
        symptom_id: SymptomId,
    ) -> Result<Option<ScoredHerb>, StoreError> {
        let mut scored = self.scored_candidates(symptom_id)?;

        scored.sort_by(|a, b| descending(a.availability_rank, b.availability_rank));

        Ok(scored.into_iter().next())
    }

    fn scored_candidates(&self, symptom_id: SymptomId) -> Result<Vec<ScoredHerb>, StoreError> {
        let candidates = self.store.effects_and_herbs_for_symptom(symptom_id)?;
        tracing::debug!("symptom {}: {} candidates", symptom_id, candidates.len());

        Ok(candidates.into_iter().map(ScoredHerb::from_candidate).collect())
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
