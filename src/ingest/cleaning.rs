//! Raw sheet cleaning
//!
//! The raw herb sheet is free-form: after the common and latin names, each
//! cell may hold a preparation form, a symptom, a score, a toxicity level or
//! a free-text note, in any column. Each cell is classified by running an
//! explicit, ordered list of rules; the first rule that accepts the cell
//! decides its class.
//!
//! Rule order (see `RULE_ORDER`):
//! 1. Blank - empty or "nan" cells are dropped
//! 2. Form - contains a preparation keyword ("tea", "root", ...)
//! 3. Symptom - contains a symptom keyword ("headache", "pain", ...)
//! 4. Score - parses as a finite number; fills availability, then cost,
//!    then popularity, extra numbers are ignored
//! 5. ToxicityLevel - exactly low / medium / high
//! 6. Note - everything else becomes part of the toxicity notes
//!
//! Keyword matching is case-insensitive substring matching, so rule order
//! matters: "ginger tea for nausea" is a form, not a symptom.

use crate::models::ToxicityLevel;
use crate::utils::string_column;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub const SYMPTOM_KEYWORDS: [&str; 19] = [
    "pain", "headache", "anxiety", "insomnia", "indigestion", "cold",
    "stress", "nervousness", "allergies", "fatigue", "detox",
    "sore throat", "joint pain", "inflammation", "nausea", "digestion",
    "liver support", "heart palpitations", "hypertension",
];

pub const FORM_KEYWORDS: [&str; 13] = [
    "dried", "fresh", "fresh root", "root", "tea", "tincture",
    "capsules", "extract", "powder", "leaf", "berries", "seeds",
    "essential oil",
];

pub const CLEAN_COLUMNS: [&str; 10] = [
    "common_name",
    "latin_name",
    "forms",
    "uses",
    "availability_score",
    "cost_score",
    "popularity_score",
    "toxicity_flag",
    "toxicity_level",
    "toxicity_notes",
];

/// Classification of a single raw cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellClass {
    Blank,
    Form(String),
    Symptom(String),
    Score(f64),
    ToxicityLevel(ToxicityLevel),
    Note(String),
}

/// One classification rule; tried in `RULE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRule {
    Blank,
    Form,
    Symptom,
    Score,
    ToxicityLevel,
    Note,
}

pub const RULE_ORDER: [CellRule; 6] = [
    CellRule::Blank,
    CellRule::Form,
    CellRule::Symptom,
    CellRule::Score,
    CellRule::ToxicityLevel,
    CellRule::Note,
];

impl CellRule {
    /// `Some(class)` if this rule accepts the (trimmed) cell
    pub fn apply(&self, cell: &str) -> Option<CellClass> {
        let lower = cell.to_lowercase();
        match self {
            CellRule::Blank => (cell.is_empty() || lower == "nan").then_some(CellClass::Blank),
            CellRule::Form => contains_any(&lower, &FORM_KEYWORDS)
                .then(|| CellClass::Form(cell.to_string())),
            CellRule::Symptom => contains_any(&lower, &SYMPTOM_KEYWORDS)
                .then(|| CellClass::Symptom(cell.to_string())),
            CellRule::Score => cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(CellClass::Score),
            CellRule::ToxicityLevel => lower
                .parse::<ToxicityLevel>()
                .ok()
                .map(CellClass::ToxicityLevel),
            CellRule::Note => Some(CellClass::Note(cell.to_string())),
        }
    }
}

fn contains_any(value: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| value.contains(k))
}

pub fn classify_cell(cell: &str) -> CellClass {
    let cell = cell.trim();
    RULE_ORDER
        .iter()
        .find_map(|rule| rule.apply(cell))
        .unwrap_or_else(|| CellClass::Note(cell.to_string()))
}

/// Cleaned herb record (one per raw row)
#[derive(Debug, Clone, PartialEq)]
pub struct CleanHerbRecord {
    pub common_name: String,
    pub latin_name: String,
    pub forms: Vec<String>,
    pub uses: Vec<String>,
    pub availability_score: Option<f64>,
    pub cost_score: Option<f64>,
    pub popularity_score: Option<f64>,
    pub toxicity_level: ToxicityLevel,
    pub toxicity_notes: String,
}

impl CleanHerbRecord {
    pub fn toxicity_flag(&self) -> bool {
        self.toxicity_level.is_flagged()
    }
}

/// Classify the cells that follow the two name columns of a raw row
pub fn clean_row<'a>(
    common_name: &str,
    latin_name: &str,
    cells: impl IntoIterator<Item = Option<&'a str>>,
) -> CleanHerbRecord {
    let mut record = CleanHerbRecord {
        common_name: common_name.trim().to_string(),
        latin_name: latin_name.trim().to_string(),
        forms: Vec::new(),
        uses: Vec::new(),
        availability_score: None,
        cost_score: None,
        popularity_score: None,
        toxicity_level: ToxicityLevel::Low,
        toxicity_notes: String::new(),
    };
    let mut notes = Vec::new();

    for cell in cells {
        match classify_cell(cell.unwrap_or("")) {
            CellClass::Blank => {}
            CellClass::Form(form) => record.forms.push(form),
            CellClass::Symptom(symptom) => record.uses.push(symptom),
            CellClass::Score(value) => {
                if record.availability_score.is_none() {
                    record.availability_score = Some(value);
                } else if record.cost_score.is_none() {
                    record.cost_score = Some(value);
                } else if record.popularity_score.is_none() {
                    record.popularity_score = Some(value);
                }
            }
            CellClass::ToxicityLevel(level) => record.toxicity_level = level,
            CellClass::Note(note) => notes.push(note),
        }
    }

    record.toxicity_notes = notes.join(" ");
    record
}

/// Read a messy raw sheet and classify every row
///
/// All columns are read as text; the first two are the common and latin
/// names. Rows without a common name are skipped.
pub fn read_raw_csv(path: &Path) -> Result<Vec<CleanHerbRecord>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load raw sheet: {:?}", path))?;

    if df.width() < 2 {
        anyhow::bail!("Raw sheet {:?} needs at least common and latin name columns", path);
    }

    let mut columns = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        columns.push(string_column(&df, name.as_str())?);
    }

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let common = columns[0][row].as_deref().unwrap_or("").trim();
        if common.is_empty() || common.eq_ignore_ascii_case("nan") {
            tracing::warn!("raw row {}: no common name, skipped", row + 1);
            continue;
        }
        let latin = columns[1][row].as_deref().unwrap_or("");

        let cells = columns[2..].iter().map(|column| column[row].as_deref());
        records.push(clean_row(common, latin, cells));
    }

    tracing::info!("Cleaned {} herb rows from {:?}", records.len(), path);
    Ok(records)
}

/// Write cleaned records; forms/uses joined with "; "
pub fn write_clean_csv(records: &[CleanHerbRecord], path: &Path) -> Result<()> {
    let mut df = df!(
        CLEAN_COLUMNS[0] => records.iter().map(|r| r.common_name.clone()).collect::<Vec<_>>(),
        CLEAN_COLUMNS[1] => records.iter().map(|r| r.latin_name.clone()).collect::<Vec<_>>(),
        CLEAN_COLUMNS[2] => records.iter().map(|r| r.forms.join("; ")).collect::<Vec<_>>(),
        CLEAN_COLUMNS[3] => records.iter().map(|r| r.uses.join("; ")).collect::<Vec<_>>(),
        CLEAN_COLUMNS[4] => records.iter().map(|r| r.availability_score).collect::<Vec<_>>(),
        CLEAN_COLUMNS[5] => records.iter().map(|r| r.cost_score).collect::<Vec<_>>(),
        CLEAN_COLUMNS[6] => records.iter().map(|r| r.popularity_score).collect::<Vec<_>>(),
        CLEAN_COLUMNS[7] => records.iter().map(|r| r.toxicity_flag() as i32).collect::<Vec<_>>(),
        CLEAN_COLUMNS[8] => records.iter().map(|r| r.toxicity_level.as_str()).collect::<Vec<_>>(),
        CLEAN_COLUMNS[9] => records.iter().map(|r| r.toxicity_notes.clone()).collect::<Vec<_>>(),
    )?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write cleaned sheet: {:?}", path))?;

    tracing::info!("Wrote {} cleaned rows to {:?}", records.len(), path);
    Ok(())
}

/// Raw sheet in, cleaned sheet out
pub fn clean_raw_csv(raw: &Path, out: &Path) -> Result<Vec<CleanHerbRecord>> {
    let records = read_raw_csv(raw)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    write_clean_csv(&records, out)?;
    Ok(records)
}

/// Read a cleaned sheet back (as written by `write_clean_csv`)
pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanHerbRecord>> {
    let df = crate::utils::read_csv_with_columns(path, &CLEAN_COLUMNS, "cleaned herbs")?;

    let common = string_column(&df, "common_name")?;
    let latin = string_column(&df, "latin_name")?;
    let forms = string_column(&df, "forms")?;
    let uses = string_column(&df, "uses")?;
    let availability = crate::utils::float_column(&df, "availability_score")?;
    let cost = crate::utils::float_column(&df, "cost_score")?;
    let popularity = crate::utils::float_column(&df, "popularity_score")?;
    let levels = string_column(&df, "toxicity_level")?;
    let notes = string_column(&df, "toxicity_notes")?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(common_name) = common[row].clone().filter(|n| !n.trim().is_empty()) else {
            tracing::warn!("cleaned row {}: no common name, skipped", row + 1);
            continue;
        };

        let toxicity_level = match levels[row].as_deref() {
            None => ToxicityLevel::Low,
            Some(level) => match level.parse() {
                Ok(level) => level,
                Err(e) => {
                    tracing::warn!("cleaned row {}: {}, skipped", row + 1, e);
                    continue;
                }
            },
        };

        records.push(CleanHerbRecord {
            common_name,
            latin_name: latin[row].clone().unwrap_or_default(),
            forms: split_list(forms[row].as_deref()),
            uses: split_list(uses[row].as_deref()),
            availability_score: availability[row],
            cost_score: cost[row],
            popularity_score: popularity[row],
            toxicity_level,
            toxicity_notes: notes[row].clone().unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Split a ";"-joined list, trimming and dropping empty entries
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
