use std::path::Path;

use arrow::compute::concat_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, DataResult};
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – any flat Parquet file (what the batch job writes)
/// * `.csv`     – header row, one column per field, types inferred
/// * `.json`    – `[{ "genre": "Drama", "count": 120 }, ...]`
pub fn read_table(path: &Path) -> DataResult<Table> {
    if !path.is_file() {
        return Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => read_parquet(path),
        "json" => read_json(path),
        "csv" => read_csv(path),
        _ => Err(DataError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars** and
/// **Spark**; record batches are concatenated into a single batch.
fn read_parquet(path: &Path) -> DataResult<Table> {
    let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataError::parse(path, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| DataError::parse(path, e))?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DataError::parse(path, e))?;

    if batches.is_empty() {
        return Ok(Table::empty(schema));
    }
    let batch = concat_batches(&schema, &batches).map_err(|e| DataError::parse(path, e))?;
    Ok(Table::new(batch))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
/// Column order is the order keys are first seen.
fn read_json(path: &Path) -> DataResult<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DataError::parse(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::parse(path, "expected top-level JSON array"))?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            names
                .iter()
                .map(|n| obj.get(n).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Table::from_rows(names, rows).map_err(|e| DataError::parse(path, e))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> DataResult<Table> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::parse(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::parse(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::parse(path, format!("CSV row {row_no}: {e}")))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Table::from_rows(headers, rows).map_err(|e| DataError::parse(path, e))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use arrow::datatypes::DataType;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_parquet_preserving_names_and_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genre_df.parquet");
        fixtures::write_genres(&path, &[("Drama", 120), ("Comedy", 80)]);

        let table = read_table(&path).unwrap();
        assert_eq!(table.column_names(), vec!["genre", "count"]);
        assert_eq!(table.data_type("genre").unwrap(), DataType::Utf8);
        assert_eq!(table.data_type("count").unwrap(), DataType::Int64);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "genre").unwrap(), CellValue::from("Drama"));
        assert_eq!(table.value(1, "count").unwrap(), CellValue::Integer(80));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_table(&dir.path().join("ratings.parquet")).unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("ratings.parquet")).unwrap();
        let err = read_table(&dir.path().join("ratings.parquet")).unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[test]
    fn garbage_parquet_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genre_df.parquet");
        fs::write(&path, b"definitely not parquet").unwrap();
        assert!(matches!(
            read_table(&path),
            Err(DataError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genres.xlsx");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            read_table(&path),
            Err(DataError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn reads_csv_with_inferred_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies_by_year.csv");
        fs::write(&path, "year,movie_count,note\n1995,12,\n1996,30,remastered\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.data_type("year").unwrap(), DataType::Int64);
        assert_eq!(table.data_type("note").unwrap(), DataType::Utf8);
        assert_eq!(table.value(0, "note").unwrap(), CellValue::Null);
        assert_eq!(table.value(1, "movie_count").unwrap(), CellValue::Integer(30));
    }

    #[test]
    fn reads_json_records_in_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("top_movies.json");
        fs::write(
            &path,
            r#"[{"title": "Heat", "rating_count": 10, "avg_rating": 4.1},
                {"title": "Alien", "rating_count": 7}]"#,
        )
        .unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.column_names(), vec!["title", "rating_count", "avg_rating"]);
        assert_eq!(table.value(1, "avg_rating").unwrap(), CellValue::Null);
    }

    #[test]
    fn json_that_is_not_an_array_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ratings.json");
        fs::write(&path, r#"{"userId": 1}"#).unwrap();
        assert!(matches!(read_table(&path), Err(DataError::Parse { .. })));
    }
}
