//! Herbal Recommender
//!
//! Symptom-driven herb recommendations over a small relational dataset.
//!
//! Layout:
//! - `ingest/`: raw sheet cleaning and CSV dataset building
//! - `data`: in-memory store loaded with Polars
//! - `duckdb_store`: DuckDB store (feature `duckdb_store`)
//! - `metrics/`: therapeutic score and availability rank
//! - `ranking`: candidate selection and ordering
//! - `explanation/`: rank-aware explanations and formatters
//! - `recommender`: free-text symptom entry point

pub mod config;
pub mod models;
pub mod store;
pub mod utils;
pub mod data;
#[cfg(feature = "duckdb_store")]
pub mod duckdb_store;
pub mod metrics;
pub mod ranking;
pub mod explanation;
pub mod recommender;
pub mod ingest;

// Re-export commonly used types
pub use config::{DataPaths, RecommenderConfig, DEFAULT_LIMIT};
pub use models::{Candidate, Effect, Herb, HerbId, Symptom, SymptomId, SymptomMatch, ToxicityLevel};
pub use store::{HerbStore, LoadReport, StoreError};
pub use data::HerbData;
#[cfg(feature = "duckdb_store")]
pub use duckdb_store::DuckDbStore;
pub use metrics::{availability_rank, therapeutic_score};
pub use ranking::{RankingEngine, ScoredHerb};
pub use explanation::{
    AvailabilityExplanation, ExplanationGenerator, JsonFormatter, MarkdownFormatter,
    RecommendationTier, TherapeuticExplanation, ToxicityWarning,
};
pub use recommender::{
    AvailabilityRecommendation, RankedRecommendation, Recommendation, RecommendationBundle,
    Recommender,
};
