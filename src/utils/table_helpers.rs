//! CSV table helpers with column validation
//!
//! Every relation is read through `read_csv_with_columns`, which fails with a
//! named `MissingColumn` error instead of surfacing a bare polars message
//! deep inside row parsing.
//!
//! Files are read with every column as text, so a column whose first rows
//! look like integers cannot fail on a later `0.5`. Column extractors cast
//! per cell; cells that cannot be cast come back as `None`.

use crate::store::StoreError;
use polars::prelude::*;
use std::path::Path;

/// Read a headered CSV and check that all `columns` are present
///
/// # Arguments
/// * `path` - CSV file
/// * `columns` - Required column names
/// * `table` - Table name for error messages (e.g., "herbs")
///
/// # Returns
/// DataFrame restricted to exactly the requested columns, in that order
pub fn read_csv_with_columns(
    path: &Path,
    columns: &[&str],
    table: &str,
) -> Result<DataFrame, StoreError> {
    if !path.exists() {
        return Err(StoreError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    // All columns as text; the extractors below do the typing per cell
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    for &expected in columns {
        if df.column(expected).is_err() {
            return Err(StoreError::MissingColumn {
                table: table.to_string(),
                column: expected.to_string(),
            });
        }
    }

    Ok(df.select(columns.iter().copied())?)
}

pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StoreError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

pub fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, StoreError> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, StoreError> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_csv_with_columns_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a,b,extra\n1,x,e1\n2,y,e2\n").unwrap();

        let df = read_csv_with_columns(&path, &["a", "b"], "test").unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_read_csv_with_columns_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let err = read_csv_with_columns(&path, &["missing_column"], "test").unwrap_err();
        assert!(err.to_string().contains("missing_column"));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv_with_columns(Path::new("/nonexistent/x.csv"), &["a"], "test")
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_late_fraction_after_whole_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut contents = String::from("id,score\n");
        for id in 1..=120 {
            contents.push_str(&format!("{},1\n", id));
        }
        contents.push_str("121,0.5\n122,n/a\n");
        fs::write(&path, contents).unwrap();

        let df = read_csv_with_columns(&path, &["id", "score"], "test").unwrap();
        let ids = int_column(&df, "id").unwrap();
        let scores = float_column(&df, "score").unwrap();

        assert_eq!(ids.len(), 122);
        assert_eq!(ids[120], Some(121));
        assert_eq!(scores[0], Some(1.0));
        assert_eq!(scores[120], Some(0.5));
        assert_eq!(scores[121], None);
    }

    #[test]
    fn test_float_column_casts_integers() {
        let df = df![
            "score" => &[1i64, 0],
        ].unwrap();

        let values = float_column(&df, "score").unwrap();
        assert_eq!(values, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_string_column_keeps_nulls() {
        let df = df![
            "notes" => &[Some("bitter"), None],
        ].unwrap();

        let values = string_column(&df, "notes").unwrap();
        assert_eq!(values, vec![Some("bitter".to_string()), None]);
    }
}
