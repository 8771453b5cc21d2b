//! Ingestion: raw sheet → cleaned records → normalized CSV relations
//!
//! - `cleaning`: ordered cell classifier for the messy raw sheet
//! - `dataset`: id assignment, symptom collection and CSV writing

pub mod cleaning;
pub mod dataset;

pub use cleaning::{
    classify_cell, clean_raw_csv, clean_row, read_clean_csv, read_raw_csv, write_clean_csv,
    CellClass, CellRule, CleanHerbRecord, RULE_ORDER,
};
pub use dataset::{build_dataset, write_dataset, Dataset, HerbRow};

use crate::config::DataPaths;
use anyhow::Result;
use std::path::Path;

/// Build the three relations from a cleaned sheet
pub fn build_from_clean(clean_csv: &Path, paths: &DataPaths) -> Result<Dataset> {
    let records = read_clean_csv(clean_csv)?;
    let dataset = build_dataset(&records);
    write_dataset(&dataset, paths)?;
    Ok(dataset)
}

/// Clean a raw sheet, keep the cleaned copy, then build the relations
pub fn build_from_raw(raw_csv: &Path, paths: &DataPaths) -> Result<Dataset> {
    let records = clean_raw_csv(raw_csv, &paths.clean())?;

    let dataset = build_dataset(&records);
    write_dataset(&dataset, paths)?;
    Ok(dataset)
}
