//! # Core Type Definitions
//!
//! This module contains all core types for the Uniscout directory engine:
//! - Record identity (`UniversityId`)
//! - Integer rating representation (`RatingTenths`)
//! - Directory entities (`UniversityRecord`, `TuitionFees`)
//! - Query state (`FilterSelection`, `TuitionBand`, `RatingBand`)
//! - Error types (`DirectoryError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (ratings are carried as tenths, never floats)
//! - Implement `Ord` where deterministic ordering matters
//! - Use saturating arithmetic when folding parsed digits

use crate::primitives::{SYNTHETIC_ID_PREFIX, TUITION_BAND_HIGH, TUITION_BAND_LOW, TUITION_BAND_MID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// RECORD IDENTITY
// =============================================================================

/// Unique, stable identifier for a university record.
///
/// Ids come from the upstream directory; records arriving without one get a
/// synthetic placeholder from the Normalizer (see [`crate::normalizer`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct UniversityId(pub String);

impl UniversityId {
    /// Create a new id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id was synthesized by the Normalizer rather than
    /// assigned by the upstream directory.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.0.starts_with(SYNTHETIC_ID_PREFIX)
    }
}

impl std::fmt::Display for UniversityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// RATING (INTEGER TENTHS)
// =============================================================================

/// A star rating in the range 0.0–5.0, carried as integer tenths (0–50).
///
/// The upstream feed publishes ratings with one decimal of precision by
/// convention. Storing tenths keeps the engine free of float arithmetic
/// while preserving that precision exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RatingTenths(pub u16);

impl RatingTenths {
    /// The maximum representable rating (5.0).
    pub const MAX: Self = Self(50);

    /// Create a rating from raw tenths, clamped to the 0–50 range.
    #[must_use]
    pub const fn new(tenths: u16) -> Self {
        if tenths > Self::MAX.0 {
            Self::MAX
        } else {
            Self(tenths)
        }
    }

    /// Raw tenths value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Whole-star component (e.g. 4 for a 4.2 rating).
    #[must_use]
    pub const fn whole_stars(self) -> u16 {
        self.0 / 10
    }

    /// Parse a decimal rating string like `"4.2"` or `"3"` into tenths.
    ///
    /// Precision beyond the first decimal digit is truncated. Returns `None`
    /// for strings that do not start with a decimal number.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        let whole: u16 = whole.parse().ok()?;
        let tenth = frac
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0) as u16;
        Some(Self::new(whole.saturating_mul(10).saturating_add(tenth)))
    }
}

impl std::fmt::Display for RatingTenths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

// =============================================================================
// TUITION FEES
// =============================================================================

/// Tuition fee display strings, as published by the upstream directory.
///
/// Fee values are opaque display strings (e.g. `"$10,000/year"`), not
/// guaranteed numeric. Numeric comparison goes through [`parse_tuition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TuitionFees {
    /// Undergraduate fee display string, if published.
    pub undergraduate: Option<String>,
    /// Postgraduate fee display string, if published.
    pub postgraduate: Option<String>,
}

impl TuitionFees {
    /// Parsed undergraduate fee figure; 0 when absent or unparseable.
    #[must_use]
    pub fn undergraduate_amount(&self) -> u64 {
        self.undergraduate
            .as_deref()
            .and_then(parse_tuition)
            .unwrap_or(0)
    }
}

/// Extract the numeric figure from a tuition display string.
///
/// Strips every non-digit character and folds the remaining digits with
/// saturating arithmetic, so `"$10,000/year"` parses to 10000. Returns
/// `None` when the string contains no digits at all.
#[must_use]
pub fn parse_tuition(text: &str) -> Option<u64> {
    let mut saw_digit = false;
    let amount = text.chars().filter_map(|c| c.to_digit(10)).fold(0u64, |acc, d| {
        saw_digit = true;
        acc.saturating_mul(10).saturating_add(u64::from(d))
    });
    saw_digit.then_some(amount)
}

// =============================================================================
// UNIVERSITY RECORD
// =============================================================================

/// One institution in the directory, after normalization.
///
/// All collection fields are guaranteed non-null (possibly empty) and keep
/// upstream insertion order, which is also display order. Timestamps are
/// opaque display strings; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRecord {
    /// Unique, stable identity (possibly synthesized).
    pub id: UniversityId,
    pub name: String,
    pub location: String,
    pub country: String,
    pub accreditation: String,
    pub description: String,
    pub campus_life: String,
    pub website: String,
    pub contact_email: String,
    pub logo_url: String,
    /// Rating in integer tenths (0–50).
    pub rating: RatingTenths,
    pub student_count: u64,
    pub established_year: u32,
    pub tuition_fees: TuitionFees,
    pub programs: Vec<String>,
    pub admission_requirements: Vec<String>,
    pub scholarships: Vec<String>,
    pub facilities: Vec<String>,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

// =============================================================================
// FILTER SELECTION
// =============================================================================

/// Transient structured query state.
///
/// An empty string or `None` in any field means "any" — the corresponding
/// filter step is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterSelection {
    /// Exact (case-insensitive) location match; empty = any.
    pub location: String,
    /// Substring (case-insensitive) program match; empty = any.
    pub program: String,
    /// Tuition band the undergraduate fee must fall into; `None` = any.
    pub tuition_band: Option<TuitionBand>,
    /// Minimum inclusive rating; `None` = any.
    pub rating_floor: Option<RatingTenths>,
}

impl FilterSelection {
    /// Whether no structured constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location.is_empty()
            && self.program.is_empty()
            && self.tuition_band.is_none()
            && self.rating_floor.is_none()
    }
}

// =============================================================================
// TUITION BANDS
// =============================================================================

/// The fixed four-band tuition ladder used for bucketed filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuitionBand {
    /// $0 – $2,000
    UpTo2000,
    /// $2,001 – $5,000
    From2001To5000,
    /// $5,001 – $10,000
    From5001To10000,
    /// $10,001 and above (unbounded)
    Above10000,
}

impl TuitionBand {
    /// All bands in ladder order.
    pub const ALL: [Self; 4] = [
        Self::UpTo2000,
        Self::From2001To5000,
        Self::From5001To10000,
        Self::Above10000,
    ];

    /// Inclusive lower and optional inclusive upper bound of the band.
    #[must_use]
    pub const fn bounds(self) -> (u64, Option<u64>) {
        match self {
            Self::UpTo2000 => (0, Some(TUITION_BAND_LOW)),
            Self::From2001To5000 => (TUITION_BAND_LOW + 1, Some(TUITION_BAND_MID)),
            Self::From5001To10000 => (TUITION_BAND_MID + 1, Some(TUITION_BAND_HIGH)),
            Self::Above10000 => (TUITION_BAND_HIGH + 1, None),
        }
    }

    /// Whether a parsed fee figure falls inside this band.
    #[must_use]
    pub const fn contains(self, amount: u64) -> bool {
        let (low, high) = self.bounds();
        match high {
            Some(high) => amount >= low && amount <= high,
            None => amount >= low,
        }
    }

    /// Human-readable dollar label for dropdown display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo2000 => "$0 - $2,000",
            Self::From2001To5000 => "$2,001 - $5,000",
            Self::From5001To10000 => "$5,001 - $10,000",
            Self::Above10000 => "$10,001+",
        }
    }
}

impl std::fmt::Display for TuitionBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// RATING BANDS
// =============================================================================

/// Cumulative rating thresholds offered as filter choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    TwoPlus,
    ThreePlus,
    FourPlus,
}

impl RatingBand {
    /// All bands in ascending threshold order.
    pub const ALL: [Self; 3] = [Self::TwoPlus, Self::ThreePlus, Self::FourPlus];

    /// The minimum inclusive rating this band selects.
    #[must_use]
    pub const fn floor(self) -> RatingTenths {
        match self {
            Self::TwoPlus => RatingTenths(20),
            Self::ThreePlus => RatingTenths(30),
            Self::FourPlus => RatingTenths(40),
        }
    }

    /// Human-readable label for dropdown display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoPlus => "2+ Stars",
            Self::ThreePlus => "3+ Stars",
            Self::FourPlus => "4+ Stars",
        }
    }
}

impl std::fmt::Display for RatingBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur around the directory engine.
///
/// The engine itself is total: malformed records, unparseable numerics and
/// out-of-range pages all degrade instead of erroring. This enum exists for
/// the seams — upstream fetches, file I/O and input validation in the app
/// and CLI layers.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The upstream directory API failed or returned a non-success envelope.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller-supplied input failed validation at an API boundary.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested record does not exist in the current snapshot.
    #[error("Record not found: {0}")]
    NotFound(String),
}

// =============================================================================
// TESTS
// =============================================================================
