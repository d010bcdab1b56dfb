//! # Query Engine
//!
//! Free-text search, structured filtering, ordering and pagination over a
//! normalized record snapshot.
//!
//! The engine is a pure function of its inputs: identical arguments always
//! produce identical, deterministically-ordered output. It has no I/O and
//! never fails — unmatched filters degrade to "no match", out-of-range
//! pages to an empty slice.

use crate::primitives::DEFAULT_PAGE_SIZE;
use crate::types::{FilterSelection, UniversityRecord};
use serde::{Deserialize, Serialize};

// =============================================================================
// QUERY
// =============================================================================

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Directory listing order: stable sort by name, case-insensitive.
    #[default]
    NameAscending,
    /// Keep input order. Comparison-selection contexts use this so the
    /// user's selection order survives.
    SelectionOrder,
}

/// One directory query: free text, structured filters, ordering and page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryQuery {
    /// Case-insensitive free-text term matched against name, location and
    /// programs; blank = no-op.
    pub free_text: String,
    /// Structured filter selection; composes with free text via AND.
    pub filters: FilterSelection,
    /// Requested result ordering.
    pub order: ResultOrder,
    /// 1-based page number; values below 1 are clamped up.
    pub page: usize,
    /// Page size; 0 falls back to [`DEFAULT_PAGE_SIZE`].
    pub page_size: usize,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            free_text: String::new(),
            filters: FilterSelection::default(),
            order: ResultOrder::NameAscending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DirectoryQuery {
    /// A query with no constraints: first page of the whole directory.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Free-text search helper.
    #[must_use]
    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            free_text: text.into(),
            ..Self::default()
        }
    }

    /// Structured-filter helper.
    #[must_use]
    pub fn filtered(filters: FilterSelection) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Set the requested page and page size.
    #[must_use]
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Keep input order instead of sorting by name.
    #[must_use]
    pub fn in_selection_order(mut self) -> Self {
        self.order = ResultOrder::SelectionOrder;
        self
    }
}

// =============================================================================
// RESULT PAGE
// =============================================================================

/// One page of query results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResultPage {
    /// The records on this page, in result order.
    pub items: Vec<UniversityRecord>,
    /// Size of the whole filtered set.
    pub total_count: usize,
    /// Number of pages; at least 1 even when the filtered set is empty.
    pub page_count: usize,
    /// The (clamped) page this slice corresponds to.
    pub page: usize,
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Execute a query against a record snapshot.
///
/// Filter steps, in order: free text, location (exact), program
/// (substring), tuition band, rating floor — all case-insensitive, all
/// composed with AND. The snapshot must not be mutated mid-call; callers
/// treat it as an immutable snapshot for the duration of one query.
#[must_use]
pub fn execute(records: &[UniversityRecord], query: &DirectoryQuery) -> ResultPage {
    let needle = query.free_text.trim().to_lowercase();
    let location = query.filters.location.trim().to_lowercase();
    let program = query.filters.program.trim().to_lowercase();

    let mut matched: Vec<&UniversityRecord> = records
        .iter()
        .filter(|r| matches_free_text(r, &needle))
        .filter(|r| location.is_empty() || r.location.to_lowercase() == location)
        .filter(|r| program.is_empty() || any_program_contains(r, &program))
        .filter(|r| {
            query
                .filters
                .tuition_band
                .is_none_or(|band| band.contains(r.tuition_fees.undergraduate_amount()))
        })
        .filter(|r| {
            query
                .filters
                .rating_floor
                .is_none_or(|floor| r.rating >= floor)
        })
        .collect();

    if query.order == ResultOrder::NameAscending {
        matched.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.name).cmp(&(b.name.to_lowercase(), &b.name))
        });
    }

    let page_size = if query.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        query.page_size
    };
    let page = query.page.max(1);
    let total_count = matched.len();
    let page_count = total_count.div_ceil(page_size).max(1);

    let items = matched
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    ResultPage {
        items,
        total_count,
        page_count,
        page,
    }
}

/// Free-text match: name OR location OR any program contains the needle.
fn matches_free_text(record: &UniversityRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(needle)
        || record.location.to_lowercase().contains(needle)
        || any_program_contains(record, needle)
}

fn any_program_contains(record: &UniversityRecord, needle: &str) -> bool {
    record
        .programs
        .iter()
        .any(|p| p.to_lowercase().contains(needle))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RatingTenths, TuitionBand, TuitionFees, UniversityId};

    fn record(name: &str, location: &str, rating: u16, programs: &[&str]) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId::new(name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            location: location.to_string(),
            rating: RatingTenths::new(rating),
            programs: programs.iter().map(|p| p.to_string()).collect(),
            ..UniversityRecord::default()
        }
    }

    fn sample() -> Vec<UniversityRecord> {
        vec![
            record("Alpha U", "Paris", 42, &["CS"]),
            record("Beta U", "Paris", 30, &["Law"]),
        ]
    }

    #[test]
    fn free_text_matches_name() {
        let page = execute(&sample(), &DirectoryQuery::free_text("alpha"));
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Alpha U");
    }

    #[test]
    fn free_text_matches_programs_and_location() {
        let page = execute(&sample(), &DirectoryQuery::free_text("law"));
        assert_eq!(page.items[0].name, "Beta U");

        let page = execute(&sample(), &DirectoryQuery::free_text("PARIS"));
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn location_filter_paginates_sorted_by_name() {
        let filters = FilterSelection {
            location: "paris".to_string(),
            ..FilterSelection::default()
        };
        let page = execute(&sample(), &DirectoryQuery::filtered(filters).with_page(1, 1));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Alpha U");
        assert_eq!(page.total_count, 2);
        assert_eq!(page.page_count, 2);
    }

    #[test]
    fn location_filter_is_exact_match() {
        let filters = FilterSelection {
            location: "Par".to_string(),
            ..FilterSelection::default()
        };
        let page = execute(&sample(), &DirectoryQuery::filtered(filters));
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn rating_floor_is_inclusive() {
        let filters = FilterSelection {
            rating_floor: Some(RatingTenths(40)),
            ..FilterSelection::default()
        };
        let page = execute(&sample(), &DirectoryQuery::filtered(filters));
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Alpha U");
    }

    #[test]
    fn tuition_band_uses_parsed_amounts() {
        let mut records = sample();
        records[0].tuition_fees = TuitionFees {
            undergraduate: Some("$10,000/year".to_string()),
            postgraduate: None,
        };
        records[1].tuition_fees = TuitionFees {
            undergraduate: Some("abc".to_string()),
            postgraduate: None,
        };

        let filters = FilterSelection {
            tuition_band: Some(TuitionBand::From5001To10000),
            ..FilterSelection::default()
        };
        let page = execute(&records, &DirectoryQuery::filtered(filters));
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Alpha U");
    }

    #[test]
    fn filters_compose_with_and() {
        let filters = FilterSelection {
            location: "paris".to_string(),
            rating_floor: Some(RatingTenths(40)),
            ..FilterSelection::default()
        };
        let query = DirectoryQuery {
            free_text: "u".to_string(),
            filters,
            ..DirectoryQuery::default()
        };
        let page = execute(&sample(), &query);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn empty_snapshot_yields_one_empty_page() {
        let page = execute(&[], &DirectoryQuery::free_text("anything"));
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn page_beyond_range_is_empty_not_error() {
        let page = execute(&sample(), &DirectoryQuery::all().with_page(99, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 2);
        assert_eq!(page.page, 99);
    }

    #[test]
    fn page_zero_clamps_to_one() {
        let page = execute(&sample(), &DirectoryQuery::all().with_page(0, 10));
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        let page = execute(&sample(), &DirectoryQuery::all().with_page(1, 0));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn selection_order_skips_sort() {
        let records = vec![
            record("Zeta U", "Oslo", 10, &[]),
            record("Alpha U", "Oslo", 10, &[]),
        ];
        let page = execute(&records, &DirectoryQuery::all().in_selection_order());
        assert_eq!(page.items[0].name, "Zeta U");

        let sorted = execute(&records, &DirectoryQuery::all());
        assert_eq!(sorted.items[0].name, "Alpha U");
    }

    #[test]
    fn name_sort_is_case_insensitive_and_stable() {
        let records = vec![
            record("beta U", "Oslo", 10, &[]),
            record("Alpha U", "Oslo", 10, &[]),
            record("BETA U", "Oslo", 10, &[]),
        ];
        let page = execute(&records, &DirectoryQuery::all());
        let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha U", "BETA U", "beta U"]);
    }
}
