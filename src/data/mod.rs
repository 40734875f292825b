/// Data layer: categories, core types, loading, and lookups.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet   (one or more per category)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + trim each file, concatenate → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered columns, Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  lookup   │  distinct identifiers, first match by normalized key
///   └──────────┘
/// ```
pub mod category;
pub mod loader;
pub mod lookup;
pub mod model;
