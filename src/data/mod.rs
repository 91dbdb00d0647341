/// Data layer: core types, loading, aggregation and selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        aux .csv (position ratios)
///        │                                │
///        ▼                                ▼
///   ┌──────────┐
///   │  loader   │  parse files → DashboardData
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  SalaryTable  │  Vec<PlayerSalaryRecord>, year/team index
///   └──────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate │  │  filter   │  pure views and lookups
///   └───────────┘  └──────────┘
///        │              │
///        └──────┬───────┘
///               ▼
///        ┌──────────────┐
///        │     view      │  DashboardView for one selection
///        └──────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
