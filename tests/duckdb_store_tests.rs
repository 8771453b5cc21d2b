//! DuckDB Store Tests
//!
//! Loads the same CSV relations into DuckDB and into `HerbData` and checks
//! that both stores answer identically.
//!
//! Run with: cargo test --features duckdb_store

#[cfg(feature = "duckdb_store")]
mod tests {
    use herbal_recommender::{
        DataPaths, DuckDbStore, HerbData, HerbStore, RankingEngine, Recommendation, Recommender,
        ToxicityLevel,
    };
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use std::path::Path;

    fn write_fixture(dir: &Path) -> DataPaths {
        let paths = DataPaths::new(dir);
        fs::write(
            paths.herbs(),
            "herb_id,common_name,latin_name,toxicity_flag,toxicity_level,availability_score,cost_score,popularity_score,toxicity_notes\n\
             1,Valerian,Valeriana officinalis,0,low,0.6,0.4,0.7,\n\
             2,Chamomile,Matricaria chamomilla,0,low,0.9,0.2,0.9,\n\
             3,Kava,Piper methysticum,1,high,0.3,0.7,0.4,Liver damage reported\n\
             4,Broken,Herba fracta,0,unknown,0.5,0.5,0.5,\n\
             2,Duplicate,Herba duplex,0,low,0.1,0.1,0.1,\n",
        ).unwrap();
        fs::write(
            paths.symptoms(),
            "symptom_id,name,description\n\
             1,Insomnia,\n\
             2,Anxiety,\n\
             3,INSOMNIA,\n",
        ).unwrap();
        fs::write(
            paths.effects(),
            "herb_id,symptom_id,potency_score,evidence_level,dosage_min,dosage_max,unit\n\
             1,1,0.8,0.7,300,600,mg\n\
             2,1,0.6,0.6,1,2,cups\n\
             3,1,0.8,0.7,100,250,mg\n\
             3,2,0.9,0.8,100,250,mg\n\
             4,1,0.9,0.9,1,2,g\n\
             9,1,0.9,0.9,1,2,g\n\
             2,3,0.9,0.9,1,2,g\n",
        ).unwrap();
        paths
    }

    #[test]
    fn test_load_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());

        let mut store = DuckDbStore::open_in_memory().unwrap();
        let report = store.load_csvs(&paths).unwrap();

        assert_eq!(report.herbs_loaded, 3);
        assert_eq!(report.herbs_skipped, 2);
        assert_eq!(report.symptoms_loaded, 2);
        assert_eq!(report.symptoms_skipped, 1);
        assert_eq!(report.effects_loaded, 4);
        assert_eq!(report.effects_skipped, 3);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());

        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.load_csvs(&paths).unwrap();

        let found = store.find_symptom_by_name("  insomnia ").unwrap().unwrap();
        assert_eq!(found.symptom_id, 1);
        assert_eq!(found.name, "Insomnia");
        assert!(store.find_symptom_by_name("Scurvy").unwrap().is_none());
    }

    fn append(path: &Path, rows: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(rows.as_bytes()).unwrap();
    }

    #[test]
    fn test_matches_in_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());

        // Malformed score and negative ids: skipped by both stores, never fatal
        append(
            &paths.herbs(),
            "5,Odd,Oddus,0,low,n/a,0.4,0.5,\n-2,Negative,Negativus,0,low,0.5,0.5,0.5,\n",
        );
        append(&paths.symptoms(), "-4,Fever,\n");
        append(
            &paths.effects(),
            "5,1,0.9,0.9,1,2,g\n-2,1,0.9,0.9,1,2,g\n1,-4,0.9,0.9,1,2,g\n",
        );

        let mut db = DuckDbStore::open_in_memory().unwrap();
        let db_report = db.load_csvs(&paths).unwrap();
        let (memory, memory_report) = HerbData::load(&paths).unwrap();
        assert_eq!(db_report, memory_report);
        assert_eq!(db_report.herbs_skipped, 4);
        assert_eq!(db_report.symptoms_skipped, 2);
        assert_eq!(db_report.effects_skipped, 6);
        assert!(db.find_symptom_by_name("Fever").unwrap().is_none());

        let from_db = db.effects_and_herbs_for_symptom(1).unwrap();
        let from_memory = memory.effects_and_herbs_for_symptom(1).unwrap();
        assert_eq!(from_db, from_memory);

        // Valerian and Kava tie at 0.77; load order keeps Valerian first
        let db_ranked = RankingEngine::new(&db).top_herbs_for_symptom(1, 3).unwrap();
        let names: Vec<&str> = db_ranked.iter().map(|s| s.herb.common_name.as_str()).collect();
        assert_eq!(names, vec!["Valerian", "Kava", "Chamomile"]);

        let pick = RankingEngine::new(&db).most_available_herb_for_symptom(1).unwrap().unwrap();
        assert_eq!(pick.herb.common_name, "Chamomile");
    }

    #[test]
    fn test_recommend_from_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());
        let db_path = dir.path().join("herbs.duckdb");

        {
            let mut store = DuckDbStore::open(&db_path).unwrap();
            store.load_csvs(&paths).unwrap();
        }

        let store = DuckDbStore::open(&db_path).unwrap();
        let Recommendation::Found(bundle) = Recommender::new(&store, 3).recommend("anxiety").unwrap() else {
            panic!("anxiety should resolve");
        };
        assert_eq!(bundle.therapeutic.len(), 1);
        let kava = &bundle.therapeutic[0];
        assert_eq!(kava.scored.herb.toxicity_level, ToxicityLevel::High);
        assert!(kava.explanation.toxicity_warning.is_some());
    }

    #[test]
    fn test_missing_file_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());

        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.load_csvs(&paths).unwrap();

        fs::remove_file(paths.effects()).unwrap();
        assert!(store.load_csvs(&paths).is_err());

        // Previous snapshot still answers
        assert!(store.find_symptom_by_name("Insomnia").unwrap().is_some());
    }
}
