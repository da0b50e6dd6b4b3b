/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ExportDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ExportDataset │  Vec<ExportRecord>, year span
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  select the year range → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  grouped sums, top-N rankings
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
