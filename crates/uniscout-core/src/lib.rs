//! # uniscout-core
//!
//! The deterministic University Directory Query Engine - THE LOGIC.
//!
//! This crate implements the pure core of Uniscout: normalizing raw
//! directory records, deriving filter facets from a snapshot, running
//! search/filter/paginate queries, and managing the bounded side-by-side
//! comparison selection.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure Rust: no async, no network dependencies
//! - Is deterministic: identical inputs always yield identical,
//!   identically-ordered output; ratings are integer tenths, never floats
//! - Is total: malformed upstream data degrades to defaults, out-of-range
//!   pages to empty slices — a query never crashes on data quality
//! - Never fetches: the app layer owns every I/O collaborator and hands
//!   the core an immutable snapshot per query

// =============================================================================
// MODULES
// =============================================================================

pub mod compare;
pub mod directory;
pub mod facets;
pub mod normalizer;
pub mod primitives;
pub mod query;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DirectoryError, FilterSelection, RatingBand, RatingTenths, TuitionBand, TuitionFees,
    UniversityId, UniversityRecord, parse_tuition,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use compare::{CompareOutcome, ComparisonSet};
pub use directory::Directory;
pub use facets::{FacetSet, derive_facets};
pub use normalizer::{Normalizer, RawUniversity};
pub use query::{DirectoryQuery, ResultOrder, ResultPage, execute};
