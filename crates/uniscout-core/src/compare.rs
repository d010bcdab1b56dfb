//! # Comparison Set Manager
//!
//! A small state machine over an ordered set of up to three record ids.
//!
//! - Insertion order preserved (it is the user's selection order)
//! - No duplicates, ever
//! - Size never exceeds [`MAX_COMPARE`]
//!
//! The manager holds identifiers only; resolving them to full records is
//! the caller's responsibility (see [`crate::directory::Directory::resolve`]),
//! keeping the manager decoupled from the data source.

use crate::primitives::MAX_COMPARE;
use crate::types::UniversityId;
use serde::{Deserialize, Serialize};

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of attempting to add a record to the comparison set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOutcome {
    /// The id was appended to the end of the set.
    Added,
    /// The id is already in the set; nothing changed.
    AlreadyPresent,
    /// The set is at capacity; nothing changed.
    CapReached,
}

// =============================================================================
// COMPARISON SET
// =============================================================================

/// The bounded, ordered selection of records being compared side-by-side.
///
/// Mutate only through [`add`](Self::add), [`remove`](Self::remove) and
/// [`clear`](Self::clear); the invariants depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComparisonSet {
    ids: Vec<UniversityId>,
}

impl ComparisonSet {
    /// Create a new empty comparison set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to append an id to the selection.
    ///
    /// No-op when the id is already present or the set is at capacity.
    pub fn add(&mut self, id: UniversityId) -> CompareOutcome {
        if self.ids.contains(&id) {
            return CompareOutcome::AlreadyPresent;
        }
        if self.ids.len() >= MAX_COMPARE {
            return CompareOutcome::CapReached;
        }
        self.ids.push(id);
        CompareOutcome::Added
    }

    /// Remove an id from the selection.
    ///
    /// Returns `true` if it was present; removing an absent id is a no-op.
    pub fn remove(&mut self, id: &UniversityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether an id is currently selected.
    #[must_use]
    pub fn contains(&self, id: &UniversityId) -> bool {
        self.ids.contains(id)
    }

    /// The selected ids, in selection order.
    #[must_use]
    pub fn ids(&self) -> &[UniversityId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the set is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COMPARE
    }

    /// How many more records can be added.
    #[must_use]
    pub fn remaining(&self) -> usize {
        MAX_COMPARE.saturating_sub(self.ids.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> UniversityId {
        UniversityId::new(s)
    }

    #[test]
    fn add_dedup_and_cap() {
        let mut set = ComparisonSet::new();
        assert_eq!(set.add(id("a")), CompareOutcome::Added);
        assert_eq!(set.add(id("b")), CompareOutcome::Added);
        assert_eq!(set.add(id("a")), CompareOutcome::AlreadyPresent);
        assert_eq!(set.add(id("c")), CompareOutcome::Added);
        assert_eq!(set.add(id("d")), CompareOutcome::CapReached);

        assert_eq!(set.ids(), &[id("a"), id("b"), id("c")]);
        assert!(set.is_full());
        assert_eq!(set.remaining(), 0);
    }

    #[test]
    fn selection_order_preserved() {
        let mut set = ComparisonSet::new();
        set.add(id("z"));
        set.add(id("a"));
        assert_eq!(set.ids(), &[id("z"), id("a")]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = ComparisonSet::new();
        set.add(id("a"));
        assert!(!set.remove(&id("b")));
        assert!(set.remove(&id("a")));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_then_add_reopens_capacity() {
        let mut set = ComparisonSet::new();
        set.add(id("a"));
        set.add(id("b"));
        set.add(id("c"));
        assert!(set.remove(&id("b")));
        assert_eq!(set.add(id("d")), CompareOutcome::Added);
        assert_eq!(set.ids(), &[id("a"), id("c"), id("d")]);
    }

    #[test]
    fn clear_resets() {
        let mut set = ComparisonSet::new();
        set.add(id("a"));
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.remaining(), 3);
    }
}
