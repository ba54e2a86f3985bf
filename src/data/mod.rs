/// Data layer: core types, loading, filtering, reshaping, and export.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (immutable for the session)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + category + indicator set → FilteredTable
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │ reshape   │          │  export   │
///   │ → charts  │          │ → csv/xlsx│
///   └──────────┘          └──────────┘
/// ```
///
/// Everything here is pure and synchronous; the UI passes a
/// `FilterSelection` in and gets chart-ready data or export bytes back.
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reshape;
pub mod summary;
