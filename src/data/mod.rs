/// Data layer: core types, loading, and derivations.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → ListingTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ListingTable  │  columns + typed cells, immutable
///   └──────────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │      │ aggregate  │
///   └──────────┘      └───────────┘
///   city / rooms        mean rent per city
///   row indices
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
