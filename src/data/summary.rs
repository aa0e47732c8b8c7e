use std::cmp::Ordering;
use std::collections::HashMap;

use super::error::DataResult;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Ordering helpers: everything returns row indices into the source table
// ---------------------------------------------------------------------------

/// Nulls (and NaN) always sort after real values, whatever the direction.
fn compare_keys(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sorted_rows(
    table: &Table,
    column: &str,
    rows: &[usize],
    descending: bool,
) -> DataResult<Vec<usize>> {
    let keys = table.f64_values(column)?;
    let mut indices = rows.to_vec();
    // Stable: equal keys keep their incoming order.
    indices.sort_by(|&a, &b| compare_keys(keys[a], keys[b], descending));
    Ok(indices)
}

fn all_rows(table: &Table) -> Vec<usize> {
    (0..table.len()).collect()
}

/// Rows sorted descending by a numeric column, truncated to the first `n`.
pub fn top_n_desc(table: &Table, column: &str, n: usize) -> DataResult<Vec<usize>> {
    let mut indices = sorted_rows(table, column, &all_rows(table), true)?;
    indices.truncate(n);
    Ok(indices)
}

/// All rows sorted ascending by a numeric column.
pub fn sort_ascending(table: &Table, column: &str) -> DataResult<Vec<usize>> {
    sorted_rows(table, column, &all_rows(table), false)
}

/// A subset of rows (e.g. a top-N selection) re-sorted ascending.
pub fn sort_rows_ascending(table: &Table, column: &str, rows: &[usize]) -> DataResult<Vec<usize>> {
    sorted_rows(table, column, rows, false)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Count rows per distinct value of `column`. Null cells are not counted.
///
/// Ordered by count descending; groups with equal counts keep the order in
/// which their first row appears.
pub fn value_counts(table: &Table, column: &str) -> DataResult<Vec<(CellValue, usize)>> {
    let mut order: Vec<CellValue> = Vec::new();
    let mut counts: HashMap<CellValue, usize> = HashMap::new();

    for value in table.values(column)? {
        if value.is_null() {
            continue;
        }
        let count = counts.entry(value.clone()).or_insert_with(|| {
            order.push(value);
            0
        });
        *count += 1;
    }

    let mut grouped: Vec<(CellValue, usize)> = order
        .into_iter()
        .map(|v| {
            let n = counts[&v];
            (v, n)
        })
        .collect();
    grouped.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(grouped)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of a numeric column over `[min, max]`.
///
/// Bins are half-open except the last, which also takes `max`. Nulls and NaN
/// are skipped. A constant column gives one bin of width 1 around the value.
pub fn histogram(table: &Table, column: &str, bins: usize) -> DataResult<Histogram> {
    let values: Vec<f64> = table
        .f64_values(column)?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Ok(Histogram::default());
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return Ok(Histogram {
            bins: vec![Bin {
                start: min - 0.5,
                end: min + 0.5,
                count: values.len(),
            }],
        });
    }

    let n_bins = bins.max(1);
    let width = range / n_bins as f64;
    let mut out: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: if i + 1 == n_bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        out[idx].count += 1;
    }

    Ok(Histogram { bins: out })
}

// ---------------------------------------------------------------------------
// Text filter
// ---------------------------------------------------------------------------

/// Rows whose `column` contains `query`, case-insensitively.
///
/// An empty (or whitespace-only) query keeps every row; null cells never
/// match a non-empty query.
pub fn title_matches(table: &Table, column: &str, query: &str) -> DataResult<Vec<usize>> {
    let values = table.values(column)?;
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok((0..values.len()).collect());
    }
    Ok(values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null() && v.to_string().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;

    fn ratings(rows: &[(i64, f64)]) -> Table {
        Table::from_rows(
            vec!["userId".into(), "rating".into()],
            rows.iter()
                .map(|&(u, r)| vec![CellValue::Integer(u), CellValue::Float(r)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let table = Table::from_rows(
            vec!["genre".into(), "count".into()],
            vec![
                vec!["Comedy".into(), 80i64.into()],
                vec!["Drama".into(), 120i64.into()],
                vec!["Horror".into(), 15i64.into()],
            ],
        )
        .unwrap();

        assert_eq!(top_n_desc(&table, "count", 2).unwrap(), vec![1, 0]);
        assert_eq!(top_n_desc(&table, "count", 10).unwrap(), vec![1, 0, 2]);
    }

    #[test]
    fn sorting_is_stable_and_puts_nulls_last() {
        let table = Table::from_rows(
            vec!["rating_count".into()],
            vec![
                vec![5i64.into()],
                vec![CellValue::Null],
                vec![2i64.into()],
                vec![5i64.into()],
            ],
        )
        .unwrap();

        assert_eq!(sort_ascending(&table, "rating_count").unwrap(), vec![2, 0, 3, 1]);
        assert_eq!(top_n_desc(&table, "rating_count", 4).unwrap(), vec![0, 3, 2, 1]);
        assert_eq!(
            sort_rows_ascending(&table, "rating_count", &[3, 1, 2]).unwrap(),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn missing_sort_column_propagates() {
        let table = ratings(&[(1, 4.0)]);
        assert!(matches!(
            top_n_desc(&table, "count", 10),
            Err(DataError::MissingColumn { .. })
        ));
    }

    #[test]
    fn value_counts_breaks_ties_by_first_appearance() {
        // user 7 and user 3 both rate twice; 7 shows up first.
        let table = ratings(&[(7, 4.0), (3, 2.0), (9, 5.0), (3, 1.0), (7, 3.5), (9, 4.0), (9, 1.5)]);
        let counts = value_counts(&table, "userId").unwrap();
        assert_eq!(
            counts,
            vec![
                (CellValue::Integer(9), 3),
                (CellValue::Integer(7), 2),
                (CellValue::Integer(3), 2),
            ]
        );
        // Deterministic across calls.
        assert_eq!(counts, value_counts(&table, "userId").unwrap());
    }

    #[test]
    fn value_counts_skips_null_keys() {
        let table = Table::from_rows(
            vec!["userId".into()],
            vec![vec![CellValue::Null], vec![CellValue::Null], vec![1i64.into()]],
        )
        .unwrap();
        assert_eq!(
            value_counts(&table, "userId").unwrap(),
            vec![(CellValue::Integer(1), 1)]
        );
    }

    #[test]
    fn histogram_covers_every_value() {
        let table = ratings(&[(1, 0.5), (1, 1.0), (2, 3.0), (2, 5.0), (3, 5.0)]);
        let hist = histogram(&table, "rating", 10).unwrap();

        assert_eq!(hist.bins.len(), 10);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.bins[0].start, 0.5);
        assert_eq!(hist.bins[9].end, 5.0);
        // max lands in the last bin rather than past it
        assert_eq!(hist.bins[9].count, 2);
    }

    #[test]
    fn histogram_of_constant_column_has_one_bin() {
        let table = ratings(&[(1, 4.0), (2, 4.0)]);
        let hist = histogram(&table, "rating", 10).unwrap();
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].center(), 4.0);
        assert_eq!(hist.bins[0].count, 2);
    }

    #[test]
    fn histogram_of_text_column_is_invalid() {
        let table = Table::from_rows(vec!["title".into()], vec![vec!["Heat".into()]]).unwrap();
        assert!(matches!(
            histogram(&table, "title", 10),
            Err(DataError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn title_filter_is_case_insensitive() {
        let table = Table::from_rows(
            vec!["title".into()],
            vec![
                vec!["The Matrix (1999)".into()],
                vec!["Heat (1995)".into()],
                vec![CellValue::Null],
            ],
        )
        .unwrap();

        assert_eq!(title_matches(&table, "title", "matrix").unwrap(), vec![0]);
        assert_eq!(title_matches(&table, "title", "  ").unwrap(), vec![0, 1, 2]);
        assert!(title_matches(&table, "title", "alien").unwrap().is_empty());
    }
}
