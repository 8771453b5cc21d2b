//! Scoring metrics
//!
//! Two independent measures are computed for every herb-symptom candidate:
//! - `therapeutic`: how well the herb works for the symptom
//! - `availability`: how easy the herb is to obtain
//!
//! They answer different questions and are never combined into one score.

pub mod therapeutic;
pub mod availability;

pub use therapeutic::{therapeutic_score, THERAPEUTIC_EVIDENCE_WEIGHT, THERAPEUTIC_POTENCY_WEIGHT};
pub use availability::{
    availability_rank, is_affordable, AFFORDABILITY_WEIGHT, AFFORDABLE_COST_THRESHOLD,
    AVAILABILITY_WEIGHT, POPULARITY_WEIGHT,
};
