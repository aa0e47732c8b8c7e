/// Data layer: core types, loading, caching and derivations.
///
/// Architecture:
/// ```text
///  output/*.parquet  (.csv / .json also accepted)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (one Arrow RecordBatch)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  DataLoader   │  name → Arc<Table>, read at most once
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  top-N, value counts, histogram → row indices / bins
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod model;
pub mod summary;

pub use cache::DataLoader;
pub use error::{DataError, DataResult};
pub use model::{CellValue, DatasetName, Table};
