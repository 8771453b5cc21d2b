//! Dataset building
//!
//! Turns cleaned herb records into the three normalized relations and writes
//! them as `herbs.csv`, `symptoms.csv` and `herb_symptom_effects.csv`.
//!
//! - herb ids are assigned 1..n in record order
//! - symptoms are the distinct union of every herb's uses, deduplicated
//!   case-insensitively, sorted, ids 1..m
//! - one effect per (herb, symptom) pair, with default effect values
//!
//! Effects are only created for names present in the symptom table, so the
//! output can never reference a phantom symptom.

use crate::config::DataPaths;
use crate::data::{EFFECT_COLUMNS, HERB_COLUMNS, SYMPTOM_COLUMNS};
use crate::ingest::cleaning::CleanHerbRecord;
use crate::models::{Effect, HerbId, Symptom, SymptomId, ToxicityLevel};
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::{self, File};
use std::path::Path;

pub const DEFAULT_POTENCY: f64 = 0.6;
pub const DEFAULT_EVIDENCE: f64 = 0.5;
pub const DEFAULT_DOSAGE_MIN: f64 = 1.0;
pub const DEFAULT_DOSAGE_MAX: f64 = 3.0;
pub const DEFAULT_UNIT: &str = "generic_units";

/// Herb row as written to herbs.csv
///
/// Scores stay optional here; rows missing one are rejected when the store
/// loads them.
#[derive(Debug, Clone, PartialEq)]
pub struct HerbRow {
    pub herb_id: HerbId,
    pub common_name: String,
    pub latin_name: String,
    pub toxicity_level: ToxicityLevel,
    pub availability_score: Option<f64>,
    pub cost_score: Option<f64>,
    pub popularity_score: Option<f64>,
    pub toxicity_notes: String,
}

/// The three normalized relations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub herbs: Vec<HerbRow>,
    pub symptoms: Vec<Symptom>,
    pub effects: Vec<Effect>,
}

pub fn build_dataset(records: &[CleanHerbRecord]) -> Dataset {
    let herbs: Vec<HerbRow> = records
        .iter()
        .zip(1..)
        .map(|(record, herb_id)| HerbRow {
            herb_id,
            common_name: record.common_name.clone(),
            latin_name: record.latin_name.clone(),
            toxicity_level: record.toxicity_level,
            availability_score: record.availability_score,
            cost_score: record.cost_score,
            popularity_score: record.popularity_score,
            toxicity_notes: record.toxicity_notes.clone(),
        })
        .collect();

    // Distinct names, sorted; first spelling in sorted order wins
    let mut names: Vec<&str> = records
        .iter()
        .flat_map(|r| r.uses.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    names.sort_unstable();
    names.dedup();

    let mut symptoms = Vec::new();
    let mut symptom_ids: FxHashMap<String, SymptomId> = FxHashMap::default();
    for name in names {
        let key = name.to_lowercase();
        if symptom_ids.contains_key(&key) {
            continue;
        }
        let symptom_id = symptoms.len() as SymptomId + 1;
        symptom_ids.insert(key, symptom_id);
        symptoms.push(Symptom {
            symptom_id,
            name: name.to_string(),
            description: String::new(),
        });
    }

    let mut effects = Vec::new();
    for (record, herb) in records.iter().zip(&herbs) {
        let mut seen = FxHashSet::default();
        for name in record.uses.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let Some(&symptom_id) = symptom_ids.get(&name.to_lowercase()) else {
                continue;
            };
            if !seen.insert(symptom_id) {
                continue;
            }
            effects.push(Effect {
                herb_id: herb.herb_id,
                symptom_id,
                potency_score: DEFAULT_POTENCY,
                evidence_level: DEFAULT_EVIDENCE,
                dosage_min: DEFAULT_DOSAGE_MIN,
                dosage_max: DEFAULT_DOSAGE_MAX,
                unit: DEFAULT_UNIT.to_string(),
            });
        }
    }

    tracing::info!(
        "Built dataset: {} herbs, {} symptoms, {} effects",
        herbs.len(),
        symptoms.len(),
        effects.len()
    );

    Dataset { herbs, symptoms, effects }
}

/// Write the three CSVs into the data directory
pub fn write_dataset(dataset: &Dataset, paths: &DataPaths) -> Result<()> {
    fs::create_dir_all(&paths.data_dir)
        .with_context(|| format!("Failed to create data dir: {:?}", paths.data_dir))?;

    let herbs = &dataset.herbs;
    let mut herbs_df = df!(
        HERB_COLUMNS[0] => herbs.iter().map(|h| h.herb_id).collect::<Vec<_>>(),
        HERB_COLUMNS[1] => herbs.iter().map(|h| h.common_name.clone()).collect::<Vec<_>>(),
        HERB_COLUMNS[2] => herbs.iter().map(|h| h.latin_name.clone()).collect::<Vec<_>>(),
        HERB_COLUMNS[3] => herbs.iter().map(|h| h.toxicity_level.is_flagged() as i32).collect::<Vec<_>>(),
        HERB_COLUMNS[4] => herbs.iter().map(|h| h.toxicity_level.as_str()).collect::<Vec<_>>(),
        HERB_COLUMNS[5] => herbs.iter().map(|h| h.availability_score).collect::<Vec<_>>(),
        HERB_COLUMNS[6] => herbs.iter().map(|h| h.cost_score).collect::<Vec<_>>(),
        HERB_COLUMNS[7] => herbs.iter().map(|h| h.popularity_score).collect::<Vec<_>>(),
        HERB_COLUMNS[8] => herbs.iter().map(|h| h.toxicity_notes.clone()).collect::<Vec<_>>(),
    )?;

    let symptoms = &dataset.symptoms;
    let mut symptoms_df = df!(
        SYMPTOM_COLUMNS[0] => symptoms.iter().map(|s| s.symptom_id).collect::<Vec<_>>(),
        SYMPTOM_COLUMNS[1] => symptoms.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
        SYMPTOM_COLUMNS[2] => symptoms.iter().map(|s| s.description.clone()).collect::<Vec<_>>(),
    )?;

    let effects = &dataset.effects;
    let mut effects_df = df!(
        EFFECT_COLUMNS[0] => effects.iter().map(|e| e.herb_id).collect::<Vec<_>>(),
        EFFECT_COLUMNS[1] => effects.iter().map(|e| e.symptom_id).collect::<Vec<_>>(),
        EFFECT_COLUMNS[2] => effects.iter().map(|e| e.potency_score).collect::<Vec<_>>(),
        EFFECT_COLUMNS[3] => effects.iter().map(|e| e.evidence_level).collect::<Vec<_>>(),
        EFFECT_COLUMNS[4] => effects.iter().map(|e| e.dosage_min).collect::<Vec<_>>(),
        EFFECT_COLUMNS[5] => effects.iter().map(|e| e.dosage_max).collect::<Vec<_>>(),
        EFFECT_COLUMNS[6] => effects.iter().map(|e| e.unit.clone()).collect::<Vec<_>>(),
    )?;

    write_csv(&mut herbs_df, &paths.herbs())?;
    write_csv(&mut symptoms_df, &paths.symptoms())?;
    write_csv(&mut effects_df, &paths.effects())?;

    tracing::info!("Wrote herbs.csv, symptoms.csv, herb_symptom_effects.csv to {:?}", paths.data_dir);
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write {:?}", path))
}
