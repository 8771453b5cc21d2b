//! Entity types for the herbal dataset
//!
//! Three relations make up the dataset:
//! - `Herb`: a remedy with accessibility and safety attributes
//! - `Symptom`: a condition a herb may address
//! - `Effect`: the herb-symptom association carrying potency/evidence/dosage
//!
//! All types are plain data and serialize with serde so query results can be
//! handed to any presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type HerbId = u32;
pub type SymptomId = u32;

/// Toxicity classification of a herb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToxicityLevel {
    Low,
    Medium,
    High,
}

impl ToxicityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToxicityLevel::Low => "low",
            ToxicityLevel::Medium => "medium",
            ToxicityLevel::High => "high",
        }
    }

    /// Anything other than `Low` carries a warning
    pub fn is_flagged(&self) -> bool {
        !matches!(self, ToxicityLevel::Low)
    }
}

impl fmt::Display for ToxicityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a toxicity label is not low/medium/high
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toxicity level '{0}'")]
pub struct UnknownToxicityLevel(pub String);

impl FromStr for ToxicityLevel {
    type Err = UnknownToxicityLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ToxicityLevel::Low),
            "medium" => Ok(ToxicityLevel::Medium),
            "high" => Ok(ToxicityLevel::High),
            _ => Err(UnknownToxicityLevel(s.to_string())),
        }
    }
}

/// Herb row
///
/// Scores are in [0, 1]. Higher availability/popularity means easier to
/// obtain, higher cost means more expensive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herb {
    pub herb_id: HerbId,
    pub common_name: String,
    pub latin_name: String,
    pub toxicity_level: ToxicityLevel,
    pub availability_score: f64,
    pub cost_score: f64,
    pub popularity_score: f64,
    pub toxicity_notes: String,
}

impl Herb {
    /// Derived from the level, never stored on its own
    pub fn toxicity_flag(&self) -> bool {
        self.toxicity_level.is_flagged()
    }
}

/// Symptom row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub symptom_id: SymptomId,
    pub name: String,
    pub description: String,
}

/// Herb-symptom association row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub herb_id: HerbId,
    pub symptom_id: SymptomId,
    pub potency_score: f64,
    pub evidence_level: f64,
    pub dosage_min: f64,
    pub dosage_max: f64,
    pub unit: String,
}

/// Resolved symptom: id plus the canonical stored spelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMatch {
    pub symptom_id: SymptomId,
    pub name: String,
}

/// One joined (herb, effect) row for a symptom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub herb: Herb,
    pub effect: Effect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toxicity_level_case_insensitive() {
        assert_eq!("High".parse::<ToxicityLevel>().unwrap(), ToxicityLevel::High);
        assert_eq!(" medium ".parse::<ToxicityLevel>().unwrap(), ToxicityLevel::Medium);
        assert_eq!("LOW".parse::<ToxicityLevel>().unwrap(), ToxicityLevel::Low);
        assert!("severe".parse::<ToxicityLevel>().is_err());
    }

    #[test]
    fn test_toxicity_flag_derived_from_level() {
        let mut herb = Herb {
            herb_id: 1,
            common_name: "Comfrey".to_string(),
            latin_name: "Symphytum officinale".to_string(),
            toxicity_level: ToxicityLevel::High,
            availability_score: 0.4,
            cost_score: 0.3,
            popularity_score: 0.2,
            toxicity_notes: "Liver toxicity with internal use".to_string(),
        };
        assert!(herb.toxicity_flag());

        herb.toxicity_level = ToxicityLevel::Medium;
        assert!(herb.toxicity_flag());

        herb.toxicity_level = ToxicityLevel::Low;
        assert!(!herb.toxicity_flag());
    }

    #[test]
    fn test_toxicity_level_serializes_lowercase() {
        let json = serde_json::to_string(&ToxicityLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
