//! Exercise catalog loading and name resolution.
//!
//! A [`Catalog`] is the collection of known exercises (identifier → record)
//! supplied by the fitness-tracking service. A [`CatalogIndex`] is built from
//! it once and resolves free-text exercise names to catalog identifiers with
//! a three-tier strategy: exact, substring, token overlap.
//!
//! # Quick start
//!
//! ```
//! use routine_import_catalog::{Catalog, CatalogIndex, MatchTier};
//!
//! let catalog = Catalog::from_json_str(r#"{
//!     "ex1": {"title": "Bench Press"},
//!     "ex2": {"title": "Incline Bench Press"},
//!     "ex3": {"title": "Lat Pulldown"}
//! }"#).unwrap();
//!
//! let index = CatalogIndex::new(&catalog);
//! assert_eq!(index.resolve("bench press").as_deref(), Some("ex1"));
//!
//! let hit = index.resolve_match("Wide Grip Pulldown").unwrap();
//! assert_eq!(hit.template_id, "ex3");
//! assert_eq!(hit.tier, MatchTier::TokenOverlap);
//! ```
//!
//! Catalog files can be loaded with [`load_catalog`]; see the [`loader`]
//! module docs for the accepted layouts.

mod error;
mod index;
pub mod loader;

pub use error::{CatalogError, Result};
pub use index::{CatalogIndex, MatchTier, Resolution};
pub use loader::{Catalog, CatalogRecord, load_catalog};
