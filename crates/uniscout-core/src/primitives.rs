//! # Engine Primitives
//!
//! Hardcoded runtime constants for the Uniscout directory engine.
//!
//! These values are compiled into the binary and immutable at runtime.
//! They bound the engine's behavior (page sizes, facet caps, comparison
//! limits) and pin the band ladder the filter facets are built from.

/// Maximum number of records in a comparison set.
///
/// The side-by-side comparison view renders at most three columns;
/// `ComparisonSet::add` rejects additions beyond this cap.
pub const MAX_COMPARE: usize = 3;

/// Maximum number of distinct program names offered as filter choices.
///
/// A deliberate UX constraint: the program dropdown stays readable. When
/// the dataset has more distinct programs than this, the overflow sentinel
/// is appended to signal that more exist.
pub const PROGRAM_FACET_CAP: usize = 5;

/// Sentinel facet entry appended when the distinct program count exceeds
/// [`PROGRAM_FACET_CAP`].
pub const PROGRAM_FACET_OVERFLOW: &str = "Other";

/// Default result page size, used when the caller passes 0.
///
/// Matches the directory listing's ten-cards-per-page layout.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum page size accepted at the API boundary.
///
/// Larger requests are clamped by the app layer to bound response sizes.
pub const MAX_PAGE_SIZE: usize = 100;

/// Prefix for identifiers synthesized by the Normalizer when a raw record
/// arrives without an id.
pub const SYNTHETIC_ID_PREFIX: &str = "missing-id-";

/// Maximum free-text query length accepted at the API boundary.
pub const MAX_FREE_TEXT_LENGTH: usize = 256;

// =============================================================================
// TUITION BAND LADDER
// =============================================================================

/// Upper bound (inclusive) of the first tuition band.
pub const TUITION_BAND_LOW: u64 = 2000;

/// Upper bound (inclusive) of the second tuition band.
pub const TUITION_BAND_MID: u64 = 5000;

/// Upper bound (inclusive) of the third tuition band; the fourth band is
/// unbounded above.
pub const TUITION_BAND_HIGH: u64 = 10_000;
