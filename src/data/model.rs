use std::fmt;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    Schema, SchemaRef, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::array_value_to_string;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// DatasetName – the files produced by the batch job
// ---------------------------------------------------------------------------

/// The logical datasets the dashboard knows about.
///
/// Each maps 1:1 to a file in the output directory. The loader itself accepts
/// any file name; this enum only spares the pages from spelling them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetName {
    /// `genre`, `count`
    GenreSummary,
    /// `year`, `movie_count`
    MoviesByYear,
    /// `title`, `rating_count`, `avg_rating`
    TopMoviesByRating,
    /// Raw ratings: `userId`, `movieId`, `rating`, ...
    Ratings,
}

impl DatasetName {
    pub const ALL: [DatasetName; 4] = [
        DatasetName::GenreSummary,
        DatasetName::MoviesByYear,
        DatasetName::TopMoviesByRating,
        DatasetName::Ratings,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetName::GenreSummary => "genre_df.parquet",
            DatasetName::MoviesByYear => "movies_by_year.parquet",
            DatasetName::TopMoviesByRating => "top_movies_by_ratings.parquet",
            DatasetName::Ratings => "ratings.parquet",
        }
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        self.file_name()
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell read out of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Grouping keys live in hash maps and sorted sets, so `CellValue` must be `Eq + Hash + Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord/Hash; floats compare by total order --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// Read one cell out of an Arrow column.
pub(crate) fn cell_value(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => CellValue::String(col.as_string_view().value(row).to_string()),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        // Dates, decimals, timestamps, ...: keep Arrow's own rendering.
        _ => array_value_to_string(col, row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null),
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable, fully loaded dataset
// ---------------------------------------------------------------------------

/// An immutable in-memory table.
///
/// Backed by a single Arrow [`RecordBatch`] so column names and data types are
/// exactly those stored in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Table { batch }
    }

    /// A table with the given schema and no rows.
    pub fn empty(schema: SchemaRef) -> Self {
        Table {
            batch: RecordBatch::new_empty(schema),
        }
    }

    /// Build a table from row-oriented cells, inferring one Arrow type per column.
    ///
    /// A column holding only integers becomes `Int64`, integers mixed with floats
    /// become `Float64`, booleans become `Boolean`; anything else is `Utf8`.
    /// Rows shorter than the header are padded with nulls.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, ArrowError> {
        let n_rows = rows.len();
        let mut fields = Vec::with_capacity(names.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());

        for (idx, name) in names.into_iter().enumerate() {
            let cells: Vec<&CellValue> = rows
                .iter()
                .map(|r| r.get(idx).unwrap_or(&NULL_CELL))
                .collect();

            let array: ArrayRef = match infer_kind(&cells) {
                ColumnKind::Integer => Arc::new(Int64Array::from(
                    cells
                        .iter()
                        .map(|c| match c {
                            CellValue::Integer(i) => Some(*i),
                            _ => None,
                        })
                        .collect::<Vec<_>>(),
                )),
                ColumnKind::Float => Arc::new(Float64Array::from(
                    cells.iter().map(|c| c.as_f64()).collect::<Vec<_>>(),
                )),
                ColumnKind::Bool => Arc::new(BooleanArray::from(
                    cells
                        .iter()
                        .map(|c| match c {
                            CellValue::Bool(b) => Some(*b),
                            _ => None,
                        })
                        .collect::<Vec<_>>(),
                )),
                ColumnKind::Text => Arc::new(StringArray::from(
                    cells
                        .iter()
                        .map(|c| (!c.is_null()).then(|| c.to_string()))
                        .collect::<Vec<_>>(),
                )),
            };

            fields.push(Field::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }

        let schema = Arc::new(Schema::new(fields));
        let options = RecordBatchOptions::new().with_row_count(Some(n_rows));
        let batch = RecordBatch::try_new_with_options(schema, arrays, &options)?;
        Ok(Table { batch })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Column names in stored order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column_index(&self, name: &str) -> DataResult<usize> {
        self.batch
            .schema()
            .index_of(name)
            .map_err(|_| DataError::MissingColumn {
                column: name.to_string(),
                available: self.column_names(),
            })
    }

    pub fn column(&self, name: &str) -> DataResult<&ArrayRef> {
        let idx = self.column_index(name)?;
        Ok(self.batch.column(idx))
    }

    /// Cell at (`row`, column position). Panics if either is out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        cell_value(self.batch.column(col), row)
    }

    /// All cells of a column, in row order.
    pub fn values(&self, column: &str) -> DataResult<Vec<CellValue>> {
        let col = self.column(column)?;
        Ok((0..col.len()).map(|row| cell_value(col, row)).collect())
    }

    /// A numeric column widened to `f64`; nulls stay `None`.
    pub fn f64_values(&self, column: &str) -> DataResult<Vec<Option<f64>>> {
        let col = self.column(column)?;
        if !col.data_type().is_numeric() {
            return Err(DataError::InvalidColumn {
                column: column.to_string(),
                data_type: col.data_type().clone(),
            });
        }
        let widened = cast(col, &DataType::Float64).map_err(|_| DataError::InvalidColumn {
            column: column.to_string(),
            data_type: col.data_type().clone(),
        })?;
        Ok(widened.as_primitive::<Float64Type>().iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

fn infer_kind(cells: &[&CellValue]) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for cell in cells {
        let this = match cell {
            CellValue::Null => continue,
            CellValue::Integer(_) => ColumnKind::Integer,
            CellValue::Float(_) => ColumnKind::Float,
            CellValue::Bool(_) => ColumnKind::Bool,
            CellValue::String(_) => return ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::Integer), ColumnKind::Float)
            | (Some(ColumnKind::Float), ColumnKind::Integer) => ColumnKind::Float,
            _ => return ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Table {
        pub(crate) fn data_type(&self, name: &str) -> DataResult<DataType> {
            Ok(self.column(name)?.data_type().clone())
        }

        pub(crate) fn value(&self, row: usize, column: &str) -> DataResult<CellValue> {
            let idx = self.column_index(column)?;
            Ok(self.cell(row, idx))
        }
    }

    fn genre_table() -> Table {
        Table::from_rows(
            vec!["genre".into(), "count".into()],
            vec![
                vec!["Drama".into(), 120i64.into()],
                vec!["Comedy".into(), 80i64.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn infers_column_types() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                vec![1i64.into(), 1i64.into(), CellValue::Bool(true), "x".into()],
                vec![2i64.into(), 2.5f64.into(), CellValue::Null, 3i64.into()],
            ],
        )
        .unwrap();

        assert_eq!(table.data_type("a").unwrap(), DataType::Int64);
        assert_eq!(table.data_type("b").unwrap(), DataType::Float64);
        assert_eq!(table.data_type("c").unwrap(), DataType::Boolean);
        assert_eq!(table.data_type("d").unwrap(), DataType::Utf8);
        assert_eq!(table.value(1, "c").unwrap(), CellValue::Null);
        assert_eq!(table.value(1, "d").unwrap(), CellValue::String("3".into()));
    }

    #[test]
    fn missing_column_lists_available_names() {
        let table = genre_table();
        match table.column("rating") {
            Err(DataError::MissingColumn { column, available }) => {
                assert_eq!(column, "rating");
                assert_eq!(available, vec!["genre".to_string(), "count".to_string()]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn f64_values_rejects_text_columns() {
        let table = genre_table();
        assert_eq!(
            table.f64_values("count").unwrap(),
            vec![Some(120.0), Some(80.0)]
        );
        assert!(matches!(
            table.f64_values("genre"),
            Err(DataError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn table_without_columns_keeps_row_count() {
        let table = Table::from_rows(Vec::new(), vec![Vec::new(), Vec::new()]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn cell_ordering_groups_by_kind() {
        let mut cells = vec![
            CellValue::String("b".into()),
            CellValue::Float(1.5),
            CellValue::Null,
            CellValue::Integer(3),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Integer(3),
                CellValue::Float(1.5),
                CellValue::String("b".into()),
            ]
        );
    }
}
