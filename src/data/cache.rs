use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use super::error::{DataError, DataResult};
use super::loader::read_table;
use super::model::Table;

// ---------------------------------------------------------------------------
// DataLoader – memoizing access to the output directory
// ---------------------------------------------------------------------------

type Slot = Arc<OnceCell<Arc<Table>>>;

/// Resolves dataset names to files under one output directory and keeps every
/// table it has read for as long as the loader lives.
///
/// Each name gets its own once-cell, so a table is materialized at most once
/// and loads of distinct names never wait on each other. The map lock is only
/// held to look up or insert a cell, never across file IO. Failed loads leave
/// the cell empty and are retried on the next call. There is no eviction: the
/// set of datasets is small and fixed.
#[derive(Debug)]
pub struct DataLoader {
    output_dir: PathBuf,
    slots: Mutex<HashMap<String, Slot>>,
}

impl DataLoader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a dataset name resolves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Load a dataset, reading the file only on the first successful call.
    ///
    /// `name` must be a plain file name inside the output directory; blank
    /// names and anything with separators or `..` are `FileNotFound`.
    pub fn load(&self, name: impl AsRef<str>) -> DataResult<Arc<Table>> {
        let name = name.as_ref();
        if !is_plain_file_name(name) {
            log::warn!("rejecting dataset name {name:?}");
            return Err(DataError::FileNotFound {
                path: self.output_dir.clone(),
            });
        }

        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(name.to_string()).or_default())
        };

        if let Some(table) = slot.get() {
            log::debug!("cache hit for {name}");
            return Ok(Arc::clone(table));
        }

        let table = slot.get_or_try_init(|| {
            let path = self.path_for(name);
            let table = read_table(&path)?;
            if table.is_empty() {
                log::warn!("{} has no rows", path.display());
            }
            log::info!(
                "Loaded {} ({} rows, columns {:?})",
                path.display(),
                table.len(),
                table.column_names()
            );
            Ok::<_, DataError>(Arc::new(table))
        })?;
        Ok(Arc::clone(table))
    }

    /// Whether a dataset has already been materialized.
    pub fn is_cached(&self, name: &str) -> bool {
        self.slots
            .lock()
            .get(name)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Names of all materialized datasets, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let slots = self.slots.lock();
        let mut names: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::model::DatasetName;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn second_load_is_served_from_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DatasetName::GenreSummary.file_name());
        fixtures::write_genres(&path, &[("Drama", 120), ("Comedy", 80)]);

        let loader = DataLoader::new(dir.path());
        let first = loader.load(DatasetName::GenreSummary).unwrap();

        // The file is gone; only the cache can answer now.
        fs::remove_file(&path).unwrap();
        let second = loader.load(DatasetName::GenreSummary).unwrap();

        assert_eq!(first.column_names(), second.column_names());
        assert_eq!(first.len(), second.len());
        assert_eq!(*first, *second);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn absent_dataset_fails_with_file_not_found() {
        let dir = tempdir().unwrap();
        let loader = DataLoader::new(dir.path());

        let err = loader.load(DatasetName::Ratings).unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
        assert!(!loader.is_cached(DatasetName::Ratings.file_name()));
    }

    #[test]
    fn empty_name_fails_with_file_not_found() {
        let dir = tempdir().unwrap();
        let loader = DataLoader::new(dir.path());
        assert!(loader.load("  ").unwrap_err().is_not_found());
    }

    #[test]
    fn names_outside_the_output_dir_are_rejected() {
        let root = tempdir().unwrap();
        let output = root.path().join("output");
        fs::create_dir(&output).unwrap();
        fixtures::write_genres(&root.path().join("x.parquet"), &[("Drama", 120)]);
        fixtures::write_genres(&output.join("x.parquet"), &[("Drama", 120)]);

        let loader = DataLoader::new(&output);
        for name in ["../x.parquet", "sub/x.parquet", "/x.parquet", "..", "."] {
            let err = loader.load(name).unwrap_err();
            assert!(err.is_not_found(), "{name}: got {err:?}");
        }
        assert_eq!(loader.cached_names(), Vec::<String>::new());
        assert!(loader.load("x.parquet").is_ok());
    }

    #[test]
    fn failed_load_is_retried() {
        let dir = tempdir().unwrap();
        let loader = DataLoader::new(dir.path());
        assert!(loader.load(DatasetName::MoviesByYear).is_err());

        fixtures::write_movies_by_year(
            &dir.path().join(DatasetName::MoviesByYear.file_name()),
            &[(1995, 12), (1996, 30)],
        );
        let table = loader.load(DatasetName::MoviesByYear).unwrap();
        assert_eq!(table.len(), 2);
        assert!(loader.is_cached(DatasetName::MoviesByYear.file_name()));
    }

    #[test]
    fn cached_names_are_sorted() {
        let dir = tempdir().unwrap();
        fixtures::write_sample_output(dir.path());
        let loader = DataLoader::new(dir.path());

        for name in DatasetName::ALL.iter().rev() {
            loader.load(name).unwrap();
        }
        assert_eq!(
            loader.cached_names(),
            vec![
                "genre_df.parquet",
                "movies_by_year.parquet",
                "ratings.parquet",
                "top_movies_by_ratings.parquet",
            ]
        );
    }

    #[test]
    fn concurrent_loads_share_one_table() {
        let dir = tempdir().unwrap();
        fixtures::write_sample_output(dir.path());
        let loader = Arc::new(DataLoader::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                thread::spawn(move || loader.load(DatasetName::Ratings).unwrap())
            })
            .collect();
        let tables: Vec<Arc<Table>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for table in &tables[1..] {
            assert!(Arc::ptr_eq(&tables[0], table));
        }
    }
}
