//! Data Loading and Management
//!
//! Loads the herbs, symptoms and herb-symptom effects relations from their
//! CSV files with Polars and holds them in memory as an immutable snapshot.
//!
//! A `HerbData` value only exists after all three relations were read and
//! validated, so a failed or partial load is never queryable.
//!
//! Row policy: rows that would break the relational invariants are skipped and
//! counted in the `LoadReport`, never repaired:
//! - herbs with a missing id or score, or an unknown toxicity level
//! - duplicate herb or symptom ids (first row wins)
//! - symptom names that collide case-insensitively with an earlier one
//! - effects missing potency/evidence, or pointing at an unknown herb/symptom

use crate::config::DataPaths;
use crate::models::{Candidate, Effect, Herb, HerbId, Symptom, SymptomId, SymptomMatch, ToxicityLevel};
use crate::store::{HerbStore, LoadReport, StoreError};
use crate::utils::{float_column, int_column, read_csv_with_columns, string_column};
use rustc_hash::FxHashMap;

pub const HERB_COLUMNS: [&str; 9] = [
    "herb_id",
    "common_name",
    "latin_name",
    "toxicity_flag",
    "toxicity_level",
    "availability_score",
    "cost_score",
    "popularity_score",
    "toxicity_notes",
];

pub const SYMPTOM_COLUMNS: [&str; 3] = ["symptom_id", "name", "description"];

pub const EFFECT_COLUMNS: [&str; 7] = [
    "herb_id",
    "symptom_id",
    "potency_score",
    "evidence_level",
    "dosage_min",
    "dosage_max",
    "unit",
];

/// In-memory herbal dataset
pub struct HerbData {
    herbs: Vec<Herb>,
    symptoms: Vec<Symptom>,
    /// Effects in load order (this order is the ranking tie-break)
    effects: Vec<Effect>,

    /// herb_id → index into `herbs`
    herb_index: FxHashMap<HerbId, usize>,

    /// lowercase name → index into `symptoms`
    symptom_names: FxHashMap<String, usize>,

    /// symptom_id → indexes into `effects`, ascending
    effects_by_symptom: FxHashMap<SymptomId, Vec<usize>>,
}

impl HerbData {
    /// Load all relations from the data directory
    pub fn load(paths: &DataPaths) -> Result<(Self, LoadReport), StoreError> {
        tracing::info!("Loading herbal dataset from {:?}", paths.data_dir);

        let mut report = LoadReport::default();

        let herbs = Self::load_herbs(paths, &mut report)?;
        let symptoms = Self::load_symptoms(paths, &mut report)?;
        let effects = Self::load_effects(paths, &mut report)?;

        let data = Self::assemble(herbs, symptoms, effects, &mut report);
        report.log();

        Ok((data, report))
    }

    /// Build a dataset from rows already in memory
    ///
    /// Applies the same duplicate and referential-integrity policy as `load`.
    pub fn from_parts(
        herbs: Vec<Herb>,
        symptoms: Vec<Symptom>,
        effects: Vec<Effect>,
    ) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let data = Self::assemble(herbs, symptoms, effects, &mut report);
        (data, report)
    }

    pub fn herbs(&self) -> &[Herb] {
        &self.herbs
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn herb(&self, herb_id: HerbId) -> Option<&Herb> {
        self.herb_index.get(&herb_id).map(|&idx| &self.herbs[idx])
    }

    /// Parse herbs.csv; rows with unusable required fields are skipped
    fn load_herbs(paths: &DataPaths, report: &mut LoadReport) -> Result<Vec<Herb>, StoreError> {
        let df = read_csv_with_columns(&paths.herbs(), &HERB_COLUMNS, "herbs")?;

        let ids = int_column(&df, "herb_id")?;
        let common = string_column(&df, "common_name")?;
        let latin = string_column(&df, "latin_name")?;
        let flags = int_column(&df, "toxicity_flag")?;
        let levels = string_column(&df, "toxicity_level")?;
        let availability = float_column(&df, "availability_score")?;
        let cost = float_column(&df, "cost_score")?;
        let popularity = float_column(&df, "popularity_score")?;
        let notes = string_column(&df, "toxicity_notes")?;

        let mut herbs = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let Some(herb_id) = ids[row].and_then(|id| HerbId::try_from(id).ok()) else {
                tracing::warn!("herbs.csv row {}: missing or invalid herb_id, skipped", row + 1);
                report.herbs_skipped += 1;
                continue;
            };

            let level = match levels[row].as_deref().unwrap_or("").parse::<ToxicityLevel>() {
                Ok(level) => level,
                Err(e) => {
                    tracing::warn!("herb {}: {}, skipped", herb_id, e);
                    report.herbs_skipped += 1;
                    continue;
                }
            };

            let (Some(a), Some(c), Some(p)) = (availability[row], cost[row], popularity[row]) else {
                tracing::warn!("herb {}: missing availability/cost/popularity score, skipped", herb_id);
                report.herbs_skipped += 1;
                continue;
            };

            if let Some(flag) = flags[row] {
                if (flag != 0) != level.is_flagged() {
                    tracing::warn!(
                        "herb {}: toxicity_flag={} disagrees with level '{}', using level",
                        herb_id, flag, level
                    );
                }
            }

            herbs.push(Herb {
                herb_id,
                common_name: common[row].clone().unwrap_or_default(),
                latin_name: latin[row].clone().unwrap_or_default(),
                toxicity_level: level,
                availability_score: a,
                cost_score: c,
                popularity_score: p,
                toxicity_notes: notes[row].clone().unwrap_or_default(),
            });
        }

        Ok(herbs)
    }

    fn load_symptoms(paths: &DataPaths, report: &mut LoadReport) -> Result<Vec<Symptom>, StoreError> {
        let df = read_csv_with_columns(&paths.symptoms(), &SYMPTOM_COLUMNS, "symptoms")?;

        let ids = int_column(&df, "symptom_id")?;
        let names = string_column(&df, "name")?;
        let descriptions = string_column(&df, "description")?;

        let mut symptoms = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let id = ids[row].and_then(|id| SymptomId::try_from(id).ok());
            let name = names[row].as_deref().map(str::trim).filter(|n| !n.is_empty());

            match (id, name) {
                (Some(symptom_id), Some(name)) => symptoms.push(Symptom {
                    symptom_id,
                    name: name.to_string(),
                    description: descriptions[row].clone().unwrap_or_default(),
                }),
                _ => {
                    tracing::warn!("symptoms.csv row {}: missing id or name, skipped", row + 1);
                    report.symptoms_skipped += 1;
                }
            }
        }

        Ok(symptoms)
    }

    fn load_effects(paths: &DataPaths, report: &mut LoadReport) -> Result<Vec<Effect>, StoreError> {
        let df = read_csv_with_columns(&paths.effects(), &EFFECT_COLUMNS, "herb_symptom_effects")?;

        let herb_ids = int_column(&df, "herb_id")?;
        let symptom_ids = int_column(&df, "symptom_id")?;
        let potency = float_column(&df, "potency_score")?;
        let evidence = float_column(&df, "evidence_level")?;
        let dosage_min = float_column(&df, "dosage_min")?;
        let dosage_max = float_column(&df, "dosage_max")?;
        let units = string_column(&df, "unit")?;

        let mut effects = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let herb_id = herb_ids[row].and_then(|id| HerbId::try_from(id).ok());
            let symptom_id = symptom_ids[row].and_then(|id| SymptomId::try_from(id).ok());

            let (Some(herb_id), Some(symptom_id), Some(p), Some(e)) =
                (herb_id, symptom_id, potency[row], evidence[row])
            else {
                tracing::warn!(
                    "herb_symptom_effects.csv row {}: missing ids or potency/evidence, skipped",
                    row + 1
                );
                report.effects_skipped += 1;
                continue;
            };

            effects.push(Effect {
                herb_id,
                symptom_id,
                potency_score: p,
                evidence_level: e,
                dosage_min: dosage_min[row].unwrap_or(0.0),
                dosage_max: dosage_max[row].unwrap_or(0.0),
                unit: units[row].clone().unwrap_or_default(),
            });
        }

        Ok(effects)
    }

    /// Deduplicate, index and enforce referential integrity
    fn assemble(
        herbs: Vec<Herb>,
        symptoms: Vec<Symptom>,
        effects: Vec<Effect>,
        report: &mut LoadReport,
    ) -> Self {
        let mut kept_herbs = Vec::with_capacity(herbs.len());
        let mut herb_index = FxHashMap::default();
        for herb in herbs {
            if herb_index.contains_key(&herb.herb_id) {
                tracing::warn!("duplicate herb_id {}, skipped", herb.herb_id);
                report.herbs_skipped += 1;
                continue;
            }
            herb_index.insert(herb.herb_id, kept_herbs.len());
            kept_herbs.push(herb);
        }

        let mut kept_symptoms = Vec::with_capacity(symptoms.len());
        let mut symptom_ids = FxHashMap::default();
        let mut symptom_names = FxHashMap::default();
        for mut symptom in symptoms {
            let name = symptom.name.trim().to_string();
            if name.is_empty() {
                tracing::warn!("symptom {} has an empty name, skipped", symptom.symptom_id);
                report.symptoms_skipped += 1;
                continue;
            }
            symptom.name = name;

            let key = symptom.name.to_lowercase();
            if symptom_ids.contains_key(&symptom.symptom_id) || symptom_names.contains_key(&key) {
                tracing::warn!(
                    "duplicate symptom {} '{}', skipped",
                    symptom.symptom_id, symptom.name
                );
                report.symptoms_skipped += 1;
                continue;
            }
            symptom_ids.insert(symptom.symptom_id, kept_symptoms.len());
            symptom_names.insert(key, kept_symptoms.len());
            kept_symptoms.push(symptom);
        }

        let mut kept_effects = Vec::with_capacity(effects.len());
        let mut effects_by_symptom: FxHashMap<SymptomId, Vec<usize>> = FxHashMap::default();
        for effect in effects {
            if !herb_index.contains_key(&effect.herb_id) || !symptom_ids.contains_key(&effect.symptom_id) {
                tracing::warn!(
                    "effect (herb {}, symptom {}) references a missing row, skipped",
                    effect.herb_id, effect.symptom_id
                );
                report.effects_skipped += 1;
                continue;
            }
            effects_by_symptom
                .entry(effect.symptom_id)
                .or_default()
                .push(kept_effects.len());
            kept_effects.push(effect);
        }

        report.herbs_loaded = kept_herbs.len();
        report.symptoms_loaded = kept_symptoms.len();
        report.effects_loaded = kept_effects.len();

        HerbData {
            herbs: kept_herbs,
            symptoms: kept_symptoms,
            effects: kept_effects,
            herb_index,
            symptom_names,
            effects_by_symptom,
        }
    }
}

impl HerbStore for HerbData {
    fn find_symptom_by_name(&self, name: &str) -> Result<Option<SymptomMatch>, StoreError> {
        Ok(self.symptom_names.get(&name.trim().to_lowercase()).map(|&idx| {
            let symptom = &self.symptoms[idx];
            SymptomMatch {
                symptom_id: symptom.symptom_id,
                name: symptom.name.clone(),
            }
        }))
    }

    fn effects_and_herbs_for_symptom(
        &self,
        symptom_id: SymptomId,
    ) -> Result<Vec<Candidate>, StoreError> {
        let Some(indexes) = self.effects_by_symptom.get(&symptom_id) else {
            return Ok(Vec::new());
        };

        // Referential integrity was enforced in assemble()
        let candidates = indexes
            .iter()
            .filter_map(|&idx| {
                let effect = &self.effects[idx];
                self.herb(effect.herb_id).map(|herb| Candidate {
                    herb: herb.clone(),
                    effect: effect.clone(),
                })
            })
            .collect();

        Ok(candidates)
    }
}
