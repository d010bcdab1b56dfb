//! # Filter Predicate Builder
//!
//! Derives the available filter facets from the current record set.
//!
//! Facets never offer a choice that would yield zero results against the
//! current dataset: band ladders only include rungs the observed maxima can
//! reach. Recompute on every data refresh; facets are a pure function of
//! the snapshot and are never cached across refreshes.

use crate::primitives::{
    PROGRAM_FACET_CAP, PROGRAM_FACET_OVERFLOW, TUITION_BAND_HIGH, TUITION_BAND_LOW,
    TUITION_BAND_MID,
};
use crate::types::{RatingBand, TuitionBand, UniversityRecord, parse_tuition};
use serde::{Deserialize, Serialize};

// =============================================================================
// FACET SET
// =============================================================================

/// The enumerable filter choices derived from one record snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FacetSet {
    /// Distinct locations, sorted case-insensitively.
    pub locations: Vec<String>,
    /// Distinct program names, capped at [`PROGRAM_FACET_CAP`]; the
    /// `"Other"` sentinel is appended when more exist than are offered.
    pub programs: Vec<String>,
    /// Tuition bands reachable by the observed maximum undergraduate fee.
    pub tuition_bands: Vec<TuitionBand>,
    /// Rating thresholds reachable by the observed maximum rating.
    pub rating_bands: Vec<RatingBand>,
}

/// Derive the facet set for a record snapshot.
#[must_use]
pub fn derive_facets(records: &[UniversityRecord]) -> FacetSet {
    FacetSet {
        locations: distinct_sorted(records.iter().map(|r| r.location.as_str())),
        programs: program_facets(records),
        tuition_bands: tuition_facets(records),
        rating_bands: rating_facets(records),
    }
}

/// Distinct non-empty values, sorted case-insensitively with the exact
/// value as tiebreak.
fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect();
    out.sort_by(|a, b| (a.to_lowercase(), a).cmp(&(b.to_lowercase(), b)));
    out.dedup();
    out
}

/// Distinct program names across all records, capped for dropdown display.
fn program_facets(records: &[UniversityRecord]) -> Vec<String> {
    let distinct = distinct_sorted(
        records
            .iter()
            .flat_map(|r| r.programs.iter().map(String::as_str)),
    );
    let overflow = distinct.len() > PROGRAM_FACET_CAP;

    let mut programs: Vec<String> = distinct.into_iter().take(PROGRAM_FACET_CAP).collect();
    if overflow {
        programs.push(PROGRAM_FACET_OVERFLOW.to_string());
    }
    programs
}

/// Tuition band ladder, cut off at the observed maximum undergraduate fee.
///
/// When no record carries a parseable figure the full ladder is offered —
/// fail open to maximal choice rather than an empty dropdown.
fn tuition_facets(records: &[UniversityRecord]) -> Vec<TuitionBand> {
    let max = records
        .iter()
        .filter_map(|r| r.tuition_fees.undergraduate.as_deref())
        .filter_map(parse_tuition)
        .max();

    let Some(max) = max else {
        return TuitionBand::ALL.to_vec();
    };

    let mut bands = vec![TuitionBand::UpTo2000];
    if max > TUITION_BAND_LOW {
        bands.push(TuitionBand::From2001To5000);
    }
    if max > TUITION_BAND_MID {
        bands.push(TuitionBand::From5001To10000);
    }
    if max > TUITION_BAND_HIGH {
        bands.push(TuitionBand::Above10000);
    }
    bands
}

/// Rating thresholds up to the observed maximum rating.
fn rating_facets(records: &[UniversityRecord]) -> Vec<RatingBand> {
    let Some(max) = records.iter().map(|r| r.rating).max() else {
        return Vec::new();
    };
    RatingBand::ALL
        .into_iter()
        .filter(|band| max >= band.floor())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
