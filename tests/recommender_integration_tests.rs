//! Recommender Integration Tests
//!
//! Runs the whole pipeline against real files in a temporary directory:
//! raw sheet → cleaned sheet → normalized CSVs → store → recommendations.

use herbal_recommender::ingest;
use herbal_recommender::{
    DataPaths, HerbData, HerbStore, MarkdownFormatter, RankingEngine, Recommendation,
    RecommendationTier, Recommender, ToxicityLevel,
};
use std::fs;
use std::path::Path;

const RAW_SHEET: &str = "\
common_name,latin_name,c1,c2,c3,c4,c5,c6,c7
Ginger,Zingiber officinale,Fresh root,Nausea,Indigestion,0.9,0.2,0.8,
Peppermint,Mentha piperita,Tea,Headache,Indigestion,0.8,0.1,0.9,
Feverfew,Tanacetum parthenium,Dried,Headache,medium,Avoid in pregnancy,0.3,0.5,0.3
Comfrey,Symphytum officinale,Leaf,Joint pain,high,Liver toxicity,0.4,0.3,0.2
";

fn write_relations(dir: &Path, herbs: &str, symptoms: &str, effects: &str) -> DataPaths {
    let paths = DataPaths::new(dir);
    fs::write(paths.herbs(), herbs).unwrap();
    fs::write(paths.symptoms(), symptoms).unwrap();
    fs::write(paths.effects(), effects).unwrap();
    paths
}

const HERBS_HEADER: &str = "herb_id,common_name,latin_name,toxicity_flag,toxicity_level,availability_score,cost_score,popularity_score,toxicity_notes\n";
const SYMPTOMS_HEADER: &str = "symptom_id,name,description\n";
const EFFECTS_HEADER: &str = "herb_id,symptom_id,potency_score,evidence_level,dosage_min,dosage_max,unit\n";

#[test]
fn test_pipeline_from_raw_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw_herbs.csv");
    fs::write(&raw, RAW_SHEET).unwrap();

    let paths = DataPaths::new(dir.path().join("data"));
    let dataset = ingest::build_from_raw(&raw, &paths).unwrap();
    assert_eq!(dataset.herbs.len(), 4);
    assert!(paths.clean().exists());

    let (data, report) = HerbData::load(&paths).unwrap();
    assert_eq!(report.herbs_loaded, 4);
    assert_eq!(report.total_skipped(), 0);

    // Headache, Indigestion, Joint pain, Nausea
    assert_eq!(data.symptoms().len(), 4);

    let recommender = Recommender::with_default_limit(&data);
    let Recommendation::Found(bundle) = recommender.recommend("HEADACHE").unwrap() else {
        panic!("headache should resolve");
    };

    // Default effect values tie every candidate; row order decides
    let names: Vec<&str> = bundle
        .therapeutic
        .iter()
        .map(|r| r.scored.herb.common_name.as_str())
        .collect();
    assert_eq!(names, vec!["Peppermint", "Feverfew"]);

    let feverfew = &bundle.therapeutic[1];
    assert_eq!(feverfew.explanation.tier, RecommendationTier::Alternative);
    let warning = feverfew.explanation.toxicity_warning.as_ref().unwrap();
    assert_eq!(warning.level, ToxicityLevel::Medium);
    assert_eq!(warning.notes.as_deref(), Some("Avoid in pregnancy"));

    let pick = bundle.availability.unwrap();
    assert_eq!(pick.scored.herb.common_name, "Peppermint");
    assert!(pick.explanation.affordability.is_some());
}

#[test]
fn test_insomnia_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_relations(
        dir.path(),
        &format!(
            "{}1,A,Herba a,0,low,0.5,0.5,0.5,\n2,B,Herba b,0,low,0.5,0.5,0.5,\n",
            HERBS_HEADER
        ),
        &format!("{}1,insomnia,\n", SYMPTOMS_HEADER),
        &format!(
            "{}2,1,0.6,0.9,1.0,3.0,g\n1,1,0.9,0.5,1.0,3.0,g\n",
            EFFECTS_HEADER
        ),
    );

    let (data, _) = HerbData::load(&paths).unwrap();
    let engine = RankingEngine::new(&data);
    let symptom = data.find_symptom_by_name("Insomnia").unwrap().unwrap();

    let ranked = engine.top_herbs_for_symptom(symptom.symptom_id, 2).unwrap();
    let names: Vec<&str> = ranked.iter().map(|s| s.herb.common_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!((ranked[0].therapeutic_score - 0.78).abs() < 1e-9);
    assert!((ranked[1].therapeutic_score - 0.69).abs() < 1e-9);
}

#[test]
fn test_toxicity_flag_follows_level() {
    let dir = tempfile::tempdir().unwrap();
    // Row 2 has a stale flag; the level decides
    let paths = write_relations(
        dir.path(),
        &format!(
            "{}1,Chaparral,Larrea tridentata,1,high,0.2,0.6,0.1,Hepatotoxic\n2,Lemon balm,Melissa officinalis,1,low,0.3,0.6,0.5,Rare allergy\n",
            HERBS_HEADER
        ),
        &format!("{}1,Cold,\n", SYMPTOMS_HEADER),
        &format!("{}1,1,0.9,0.9,1,3,g\n2,1,0.5,0.5,1,3,g\n", EFFECTS_HEADER),
    );

    let (data, _) = HerbData::load(&paths).unwrap();
    assert!(data.herb(1).unwrap().toxicity_flag());
    assert!(!data.herb(2).unwrap().toxicity_flag());

    let Recommendation::Found(bundle) = Recommender::new(&data, 3).recommend("cold").unwrap() else {
        panic!("cold should resolve");
    };
    assert!(bundle.therapeutic[0].explanation.toxicity_warning.is_some());
    assert!(bundle.therapeutic[1].explanation.toxicity_warning.is_none());
}

#[test]
fn test_affordability_remark_on_single_candidate() {
    for (cost, expect_remark) in [("0.3", true), ("0.5", false)] {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_relations(
            dir.path(),
            &format!("{}1,Thyme,Thymus vulgaris,0,low,0.7,{},0.6,\n", HERBS_HEADER, cost),
            &format!("{}1,Sore throat,\n", SYMPTOMS_HEADER),
            &format!("{}1,1,0.6,0.5,1,3,g\n", EFFECTS_HEADER),
        );

        let (data, _) = HerbData::load(&paths).unwrap();
        let Recommendation::Found(bundle) = Recommender::new(&data, 3).recommend("sore throat").unwrap() else {
            panic!("sore throat should resolve");
        };

        let pick = bundle.availability.unwrap();
        assert_eq!(pick.explanation.affordability.is_some(), expect_remark, "cost {}", cost);
    }
}

#[test]
fn test_dangling_effect_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_relations(
        dir.path(),
        &format!("{}1,Sage,Salvia officinalis,0,low,0.6,0.4,0.5,\n", HERBS_HEADER),
        &format!("{}1,Sore throat,\n", SYMPTOMS_HEADER),
        &format!(
            "{}1,1,0.6,0.5,1,3,g\n1,2,0.9,0.9,1,3,g\n9,1,0.9,0.9,1,3,g\n",
            EFFECTS_HEADER
        ),
    );

    let (data, report) = HerbData::load(&paths).unwrap();
    assert_eq!(report.effects_loaded, 1);
    assert_eq!(report.effects_skipped, 2);
    assert_eq!(data.symptoms().len(), 1);
    assert!(data.effects_and_herbs_for_symptom(2).unwrap().is_empty());
}

#[test]
fn test_not_found_and_empty_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_relations(
        dir.path(),
        &format!("{}1,Sage,Salvia officinalis,0,low,0.6,0.4,0.5,\n", HERBS_HEADER),
        &format!("{}1,Sore throat,\n2,Fatigue,\n", SYMPTOMS_HEADER),
        &format!("{}1,1,0.6,0.5,1,3,g\n", EFFECTS_HEADER),
    );
    let (data, _) = HerbData::load(&paths).unwrap();
    let recommender = Recommender::with_default_limit(&data);

    let missing = recommender.recommend("Scurvy").unwrap();
    assert!(matches!(missing, Recommendation::SymptomNotFound { .. }));
    assert!(MarkdownFormatter::format(&missing).contains("No symptom found matching: Scurvy"));

    let empty = recommender.recommend("fatigue").unwrap();
    let Recommendation::Found(bundle) = &empty else {
        panic!("fatigue exists");
    };
    assert!(!bundle.has_potency_data());
    assert!(!bundle.has_availability_data());

    let text = MarkdownFormatter::format(&empty);
    assert!(text.contains("No potency data found for this symptom."));
    assert!(text.contains("No availability data found."));
}
