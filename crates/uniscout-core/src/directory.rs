//! # Directory Module
//!
//! The session-style façade over one normalized record snapshot.
//!
//! A `Directory` owns the records fetched from the upstream data source
//! (already run through the Normalizer) and exposes the engine operations
//! over them. The snapshot is immutable between refreshes; `replace`
//! swaps it wholesale, which is the only mutation.

use crate::compare::ComparisonSet;
use crate::facets::{FacetSet, derive_facets};
use crate::normalizer::{Normalizer, RawUniversity};
use crate::query::{DirectoryQuery, ResultPage, execute};
use crate::types::{UniversityId, UniversityRecord};

/// One immutable snapshot of the university directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<UniversityRecord>,
}

impl Directory {
    /// Create an empty directory (the degraded state after a failed fetch).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory by normalizing a raw upstream batch.
    #[must_use]
    pub fn from_raw(batch: &[RawUniversity]) -> Self {
        Self {
            records: Normalizer::normalize(batch),
        }
    }

    /// Build a directory from already-normalized records.
    #[must_use]
    pub fn from_records(records: Vec<UniversityRecord>) -> Self {
        Self { records }
    }

    /// Replace the snapshot with a freshly fetched raw batch.
    pub fn replace(&mut self, batch: &[RawUniversity]) {
        self.records = Normalizer::normalize(batch);
    }

    /// The normalized records, in upstream order.
    #[must_use]
    pub fn records(&self) -> &[UniversityRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up one record by id.
    #[must_use]
    pub fn find(&self, id: &UniversityId) -> Option<&UniversityRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Derive the filter facets for the current snapshot.
    #[must_use]
    pub fn facets(&self) -> FacetSet {
        derive_facets(&self.records)
    }

    /// Run a query against the current snapshot.
    #[must_use]
    pub fn query(&self, query: &DirectoryQuery) -> ResultPage {
        execute(&self.records, query)
    }

    /// Resolve a comparison set to full records, in selection order.
    ///
    /// Ids that no longer resolve (e.g. removed by an admin edit between
    /// refreshes) are silently skipped.
    #[must_use]
    pub fn resolve(&self, set: &ComparisonSet) -> Vec<&UniversityRecord> {
        set.ids().iter().filter_map(|id| self.find(id)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
