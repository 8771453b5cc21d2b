//! Data Store query interface
//!
//! The ranking engine only sees the store through `HerbStore`, so the
//! in-memory relations (`HerbData`) and the DuckDB backend are
//! interchangeable. A store handle is always passed in explicitly.
//!
//! Stores are read-only once loaded: every implementation must refuse to
//! expose a partially loaded dataset, and every `Effect` it returns must
//! reference an existing herb and symptom. The ranking engine relies on this
//! and does not re-check referential integrity.

use crate::models::{Candidate, SymptomId, SymptomMatch};
use polars::prelude::PolarsError;

/// Errors raised while loading or querying a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table: {0}")]
    Polars(#[from] PolarsError),

    #[cfg(feature = "duckdb_store")]
    #[error("duckdb: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("{table}: missing expected column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// Read access to the herbs / symptoms / effects relations
pub trait HerbStore {
    /// Case-insensitive exact match on the symptom name
    fn find_symptom_by_name(&self, name: &str) -> Result<Option<SymptomMatch>, StoreError>;

    /// Every (herb, effect) pair for the symptom, in effect-row load order
    fn effects_and_herbs_for_symptom(
        &self,
        symptom_id: SymptomId,
    ) -> Result<Vec<Candidate>, StoreError>;
}

impl<S: HerbStore + ?Sized> HerbStore for &S {
    fn find_symptom_by_name(&self, name: &str) -> Result<Option<SymptomMatch>, StoreError> {
        (**self).find_symptom_by_name(name)
    }

    fn effects_and_herbs_for_symptom(
        &self,
        symptom_id: SymptomId,
    ) -> Result<Vec<Candidate>, StoreError> {
        (**self).effects_and_herbs_for_symptom(symptom_id)
    }
}

/// Row counts from a completed load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub herbs_loaded: usize,
    pub herbs_skipped: usize,
    pub symptoms_loaded: usize,
    pub symptoms_skipped: usize,
    pub effects_loaded: usize,
    pub effects_skipped: usize,
}

impl LoadReport {
    pub fn total_skipped(&self) -> usize {
        self.herbs_skipped + self.symptoms_skipped + self.effects_skipped
    }

    pub fn log(&self) {
        tracing::info!(
            "Loaded herbs={} symptoms={} effects={} (skipped herbs={}, symptoms={}, effects={})",
            self.herbs_loaded,
            self.symptoms_loaded,
            self.effects_loaded,
            self.herbs_skipped,
            self.symptoms_skipped,
            self.effects_skipped,
        );
    }
}
