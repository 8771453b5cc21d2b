//! DuckDB-backed store
//!
//! Loads the three CSV relations into DuckDB tables inside one transaction and
//! answers the `HerbStore` queries with SQL. The load either commits
//! completely or rolls back, so a half-loaded database is never queried.
//!
//! Files are read with every column as text and converted with `TRY_CAST`, so a
//! malformed cell becomes NULL and its row is filtered instead of failing the
//! load. Row policy matches `HerbData`: ids outside the `u32` range,
//! duplicates (first row wins), herbs missing a score or carrying an unknown
//! toxicity level, and dangling or score-less effects are deleted before
//! commit. Candidates are returned in effect `rowid` order, the same
//! tie-break order as the in-memory store.

use crate::config::DataPaths;
use crate::models::{Candidate, Effect, Herb, SymptomId, SymptomMatch, ToxicityLevel};
use crate::store::{HerbStore, LoadReport, StoreError};
use duckdb::types::Type;
use duckdb::{params, Connection, OptionalExt};
use std::path::Path;

const SCHEMA_SQL: &str = "
DROP TABLE IF EXISTS herb_symptom_effects;
DROP TABLE IF EXISTS herbs;
DROP TABLE IF EXISTS symptoms;

CREATE TABLE herbs (
    herb_id            BIGINT,
    common_name        VARCHAR,
    latin_name         VARCHAR,
    toxicity_flag      INTEGER,
    toxicity_level     VARCHAR,
    availability_score DOUBLE,
    cost_score         DOUBLE,
    popularity_score   DOUBLE,
    toxicity_notes     VARCHAR
);

CREATE TABLE symptoms (
    symptom_id  BIGINT,
    name        VARCHAR,
    description VARCHAR
);

CREATE TABLE herb_symptom_effects (
    herb_id        BIGINT,
    symptom_id     BIGINT,
    potency_score  DOUBLE,
    evidence_level DOUBLE,
    dosage_min     DOUBLE,
    dosage_max     DOUBLE,
    unit           VARCHAR
);
";

/// Text → typed row conversion per table; `{path}` is the quoted CSV literal
const HERBS_INSERT: &str = "
INSERT INTO herbs
SELECT
    TRY_CAST(herb_id AS BIGINT),
    common_name,
    latin_name,
    TRY_CAST(toxicity_flag AS INTEGER),
    toxicity_level,
    TRY_CAST(availability_score AS DOUBLE),
    TRY_CAST(cost_score AS DOUBLE),
    TRY_CAST(popularity_score AS DOUBLE),
    toxicity_notes
FROM read_csv({path}, header = true, all_varchar = true)";

const SYMPTOMS_INSERT: &str = "
INSERT INTO symptoms
SELECT
    TRY_CAST(symptom_id AS BIGINT),
    trim(name),
    description
FROM read_csv({path}, header = true, all_varchar = true)";

const EFFECTS_INSERT: &str = "
INSERT INTO herb_symptom_effects
SELECT
    TRY_CAST(herb_id AS BIGINT),
    TRY_CAST(symptom_id AS BIGINT),
    TRY_CAST(potency_score AS DOUBLE),
    TRY_CAST(evidence_level AS DOUBLE),
    TRY_CAST(dosage_min AS DOUBLE),
    TRY_CAST(dosage_max AS DOUBLE),
    unit
FROM read_csv({path}, header = true, all_varchar = true)";

/// Cleanup statements run after the inserts, in order
const HERB_FILTERS: [&str; 2] = [
    "DELETE FROM herbs
     WHERE herb_id IS NULL OR herb_id < 0 OR herb_id > 4294967295
        OR availability_score IS NULL OR isnan(availability_score)
        OR cost_score IS NULL OR isnan(cost_score)
        OR popularity_score IS NULL OR isnan(popularity_score)
        OR toxicity_level IS NULL
        OR lower(trim(toxicity_level)) NOT IN ('low', 'medium', 'high')",
    "DELETE FROM herbs
     WHERE rowid NOT IN (SELECT min(rowid) FROM herbs GROUP BY herb_id)",
];

const SYMPTOM_FILTERS: [&str; 3] = [
    "DELETE FROM symptoms
     WHERE symptom_id IS NULL OR symptom_id < 0 OR symptom_id > 4294967295
        OR name IS NULL OR name = ''",
    "DELETE FROM symptoms
     WHERE rowid NOT IN (SELECT min(rowid) FROM symptoms GROUP BY symptom_id)",
    "DELETE FROM symptoms
     WHERE rowid NOT IN (SELECT min(rowid) FROM symptoms GROUP BY lower(name))",
];

const EFFECT_FILTERS: [&str; 1] = [
    "DELETE FROM herb_symptom_effects
     WHERE herb_id IS NULL OR symptom_id IS NULL
        OR herb_id < 0 OR symptom_id < 0
        OR potency_score IS NULL OR isnan(potency_score)
        OR evidence_level IS NULL OR isnan(evidence_level)
        OR herb_id NOT IN (SELECT herb_id FROM herbs)
        OR symptom_id NOT IN (SELECT symptom_id FROM symptoms)",
];

const FIND_SYMPTOM_SQL: &str = "
SELECT symptom_id, name
FROM symptoms
WHERE lower(name) = lower(?)
LIMIT 1";

const CANDIDATES_SQL: &str = "
SELECT
    h.herb_id,
    h.common_name,
    h.latin_name,
    h.toxicity_level,
    h.availability_score,
    h.cost_score,
    h.popularity_score,
    h.toxicity_notes,
    e.symptom_id,
    e.potency_score,
    e.evidence_level,
    e.dosage_min,
    e.dosage_max,
    e.unit
FROM herb_symptom_effects e
JOIN herbs h ON h.herb_id = e.herb_id
WHERE e.symptom_id = ?
ORDER BY e.rowid";

pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    /// Replace all tables with the CSVs from `paths` in one transaction
    pub fn load_csvs(&mut self, paths: &DataPaths) -> Result<LoadReport, StoreError> {
        for path in [paths.herbs(), paths.symptoms(), paths.effects()] {
            if !path.exists() {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                });
            }
        }

        tracing::info!("Loading CSVs from {:?} into DuckDB", paths.data_dir);

        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;

        for (insert, path) in [
            (HERBS_INSERT, paths.herbs()),
            (SYMPTOMS_INSERT, paths.symptoms()),
            (EFFECTS_INSERT, paths.effects()),
        ] {
            let literal = format!("'{}'", path.display().to_string().replace('\'', "''"));
            tx.execute_batch(&insert.replace("{path}", &literal))?;
        }

        let mut report = LoadReport::default();

        let herbs_read = count_rows(&tx, "herbs")?;
        for sql in HERB_FILTERS {
            tx.execute(sql, [])?;
        }
        report.herbs_loaded = count_rows(&tx, "herbs")?;
        report.herbs_skipped = herbs_read - report.herbs_loaded;

        let symptoms_read = count_rows(&tx, "symptoms")?;
        for sql in SYMPTOM_FILTERS {
            tx.execute(sql, [])?;
        }
        report.symptoms_loaded = count_rows(&tx, "symptoms")?;
        report.symptoms_skipped = symptoms_read - report.symptoms_loaded;

        let effects_read = count_rows(&tx, "herb_symptom_effects")?;
        for sql in EFFECT_FILTERS {
            tx.execute(sql, [])?;
        }
        report.effects_loaded = count_rows(&tx, "herb_symptom_effects")?;
        report.effects_skipped = effects_read - report.effects_loaded;

        tx.commit()?;

        if report.total_skipped() > 0 {
            tracing::warn!("{} row(s) rejected during DuckDB load", report.total_skipped());
        }
        report.log();

        Ok(report)
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row(&format!("SELECT count(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count as usize)
}

impl HerbStore for DuckDbStore {
    fn find_symptom_by_name(&self, name: &str) -> Result<Option<SymptomMatch>, StoreError> {
        let found = self
            .conn
            .query_row(FIND_SYMPTOM_SQL, params![name.trim()], |row| {
                Ok(SymptomMatch {
                    symptom_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;

        Ok(found)
    }

    fn effects_and_herbs_for_symptom(
        &self,
        symptom_id: SymptomId,
    ) -> Result<Vec<Candidate>, StoreError> {
        let mut stmt = self.conn.prepare(CANDIDATES_SQL)?;

        let rows = stmt.query_map(params![symptom_id], |row| {
            let level: String = row.get(3)?;
            let toxicity_level = level
                .parse::<ToxicityLevel>()
                .map_err(|e| duckdb::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

            let herb_id = row.get(0)?;
            Ok(Candidate {
                herb: Herb {
                    herb_id,
                    common_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    latin_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    toxicity_level,
                    availability_score: row.get(4)?,
                    cost_score: row.get(5)?,
                    popularity_score: row.get(6)?,
                    toxicity_notes: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                },
                effect: Effect {
                    herb_id,
                    symptom_id: row.get(8)?,
                    potency_score: row.get(9)?,
                    evidence_level: row.get(10)?,
                    dosage_min: row.get::<_, Option<f64>>(11)?.unwrap_or(0.0),
                    dosage_max: row.get::<_, Option<f64>>(12)?.unwrap_or(0.0),
                    unit: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
                },
            })
        })?;

        let candidates = rows.collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("duckdb: {} candidates for symptom {}", candidates.len(), symptom_id);

        Ok(candidates)
    }
}
