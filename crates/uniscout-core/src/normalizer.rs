//! # Record Normalizer
//!
//! Defensive defaulting of raw upstream records into well-formed entities.
//!
//! - Synthesize unique placeholder ids for records missing one
//! - Default array fields to empty sequences, never null
//! - Default numeric fields to zero when absent or non-numeric
//! - Never fail: this is a UI-facing feed, so degrade rather than crash

use crate::primitives::SYNTHETIC_ID_PREFIX;
use crate::types::{RatingTenths, TuitionFees, UniversityId, UniversityRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

// =============================================================================
// RAW RECORD
// =============================================================================

/// One raw university object as the upstream directory publishes it.
///
/// Every field is tolerant: any JSON shape deserializes, and the Normalizer
/// decides what survives. Field names follow the upstream camelCase wire
/// format, with `_id` and `logo` accepted as legacy aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawUniversity {
    #[serde(alias = "_id")]
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub location: Option<Value>,
    pub country: Option<Value>,
    pub accreditation: Option<Value>,
    pub description: Option<Value>,
    pub campus_life: Option<Value>,
    pub website: Option<Value>,
    pub contact_email: Option<Value>,
    #[serde(alias = "logo")]
    pub logo_url: Option<Value>,
    pub rating: Option<Value>,
    pub student_count: Option<Value>,
    pub established_year: Option<Value>,
    pub tuition_fees: Option<Value>,
    pub programs: Option<Value>,
    pub admission_requirements: Option<Value>,
    pub scholarships: Option<Value>,
    pub facilities: Option<Value>,
    pub featured: Option<Value>,
    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
}

impl RawUniversity {
    /// Interpret an arbitrary JSON value as a raw record.
    ///
    /// Non-object values produce an all-empty record, which the Normalizer
    /// then fills with defaults and a synthetic id.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

// =============================================================================
// NORMALIZER
// =============================================================================

/// The Normalizer turns raw upstream batches into well-formed records.
///
/// `normalize` is a pure function over its input: no side effects, no
/// errors. Synthetic ids are batch-local counters and are not stable
/// across repeated fetches of the same data.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw batch into well-formed [`UniversityRecord`]s.
    ///
    /// Guarantees for every output record:
    /// - a non-empty id, unique against every other id in the batch; when
    ///   the upstream repeats an id, only the first occurrence keeps it and
    ///   later occurrences get synthetic replacements
    /// - non-null collection fields (possibly empty), upstream order kept
    /// - numeric fields defaulted to zero when absent or non-numeric
    #[must_use]
    pub fn normalize(batch: &[RawUniversity]) -> Vec<UniversityRecord> {
        // Every real id claimed by the batch; synthetic ids must not collide
        // with any of them, even ones later displaced as duplicates.
        let mut taken: BTreeSet<String> = batch
            .iter()
            .filter_map(|raw| {
                let id = Self::text(&raw.id);
                let id = id.trim();
                (!id.is_empty()).then(|| id.to_string())
            })
            .collect();

        // Ids already handed out to earlier records in this batch.
        let mut assigned: BTreeSet<String> = BTreeSet::new();
        let mut next_synthetic: usize = 1;
        batch
            .iter()
            .map(|raw| Self::normalize_one(raw, &mut taken, &mut assigned, &mut next_synthetic))
            .collect()
    }

    fn normalize_one(
        raw: &RawUniversity,
        taken: &mut BTreeSet<String>,
        assigned: &mut BTreeSet<String>,
        next_synthetic: &mut usize,
    ) -> UniversityRecord {
        let provided = Self::text(&raw.id);
        let provided = provided.trim();
        let id = if provided.is_empty() || !assigned.insert(provided.to_string()) {
            Self::synthesize_id(taken, next_synthetic)
        } else {
            provided.to_string()
        };

        UniversityRecord {
            id: UniversityId::new(id),
            name: Self::text(&raw.name),
            location: Self::text(&raw.location),
            country: Self::text(&raw.country),
            accreditation: Self::text(&raw.accreditation),
            description: Self::text(&raw.description),
            campus_life: Self::text(&raw.campus_life),
            website: Self::text(&raw.website),
            contact_email: Self::text(&raw.contact_email),
            logo_url: Self::text(&raw.logo_url),
            rating: Self::rating(&raw.rating),
            student_count: Self::integer(&raw.student_count),
            established_year: Self::integer(&raw.established_year) as u32,
            tuition_fees: Self::tuition(&raw.tuition_fees),
            programs: Self::string_list(&raw.programs),
            admission_requirements: Self::string_list(&raw.admission_requirements),
            scholarships: Self::string_list(&raw.scholarships),
            facilities: Self::string_list(&raw.facilities),
            featured: matches!(raw.featured, Some(Value::Bool(true))),
            created_at: Self::text(&raw.created_at),
            updated_at: Self::text(&raw.updated_at),
        }
    }

    /// Allocate the next free synthetic id for this batch.
    fn synthesize_id(taken: &mut BTreeSet<String>, next: &mut usize) -> String {
        loop {
            let candidate = format!("{}{}", SYNTHETIC_ID_PREFIX, *next);
            *next = next.saturating_add(1);
            if taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Best-effort string view of a raw value; empty for non-text shapes.
    fn text(value: &Option<Value>) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Rating in tenths; zero when absent or non-numeric.
    ///
    /// JSON numbers go through their decimal string form so the conversion
    /// stays free of float arithmetic.
    fn rating(value: &Option<Value>) -> RatingTenths {
        let text = match value {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => return RatingTenths::default(),
        };
        RatingTenths::parse(&text).unwrap_or_default()
    }

    /// Non-negative integer; zero when absent, negative or non-numeric.
    fn integer(value: &Option<Value>) -> u64 {
        match value {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(v) => v,
                // Fractional upstream values: take the whole part.
                None => {
                    let text = n.to_string();
                    let whole = text.split('.').next().unwrap_or("");
                    whole.parse().unwrap_or(0)
                }
            },
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Array of strings; non-string elements dropped, non-arrays empty.
    fn string_list(value: &Option<Value>) -> Vec<String> {
        match value {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Tuition fee object; both fields optional, non-objects empty.
    fn tuition(value: &Option<Value>) -> TuitionFees {
        let Some(Value::Object(map)) = value else {
            return TuitionFees::default();
        };
        TuitionFees {
            undergraduate: Self::fee_text(map.get("undergraduate")),
            postgraduate: Self::fee_text(map.get("postgraduate")),
        }
    }

    fn fee_text(value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
