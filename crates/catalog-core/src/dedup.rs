//! # Duplicate Reconciliation
//!
//! Repeated vendor imports leave several rows per (`item_code`, `vendor`).
//! This module collapses them into one row per key.
//!
//! ## Merge Walkthrough
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Fetched (SQL order)                      Merged                        │
//! │                                                                         │
//! │  X100 | V1 | cat: NULL | $4.10    ──┐                                  │
//! │  B200 | V1 | cat: Dairy| NULL       │──► X100 | V1 | cat: Meat | $4.10 │
//! │  X100 | V1 | cat: Meat | $3.90    ──┘    B200 | V1 | cat: Dairy| NULL  │
//! │                                                                         │
//! │  • X100 keeps first-seen position and its populated price              │
//! │  • its empty category is filled from the later duplicate               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The merge is a pure function over a row list so it can be tested
//! without a database.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::ProductRow;

// =============================================================================
// Merge Policy
// =============================================================================

/// How one attribute is reconciled across duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMerge {
    /// Copy a later value only while the seed's value is empty.
    #[default]
    FillIfEmpty,
    /// Never look past the first row.
    KeepFirst,
    /// Every later non-empty value overwrites the current one.
    PreferLatest,
}

impl FieldMerge {
    fn apply<T: Clone>(&self, current: &mut Option<T>, incoming: &Option<T>) {
        if incoming.is_none() {
            return;
        }
        match self {
            FieldMerge::FillIfEmpty if current.is_none() => *current = incoming.clone(),
            FieldMerge::PreferLatest => *current = incoming.clone(),
            _ => {}
        }
    }
}

/// Per-field merge policy for the attributes duplicates may disagree on.
///
/// The default fills all three fields only when empty. `price` is the field
/// most likely to have legitimately changed between import runs, which is
/// why it can be configured separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    pub category: FieldMerge,
    pub unit: FieldMerge,
    pub price: FieldMerge,
}

// =============================================================================
// Dedupe
// =============================================================================

/// Collapses rows sharing (`item_code`, `vendor`) into one row per key.
///
/// ## Rules
/// 1. Keys keep the order in which they were first seen
/// 2. The first row for a key seeds the merged record
/// 3. For `category`, `unit` (`uom_id`) and `price`, later rows are applied
///    through `policy`. Blank categories count as empty
/// 4. Every other attribute comes from the seed row
///
/// ## Example
/// ```rust
/// use catalog_core::dedup::{dedupe, MergePolicy};
/// use catalog_core::types::ProductRow;
///
/// let row = |id, category: Option<&str>| ProductRow {
///     id,
///     item_code: "X100".into(),
///     description: "Ground beef".into(),
///     price_cents: None,
///     vendor: "V1".into(),
///     category: category.map(String::from),
///     uom_id: None,
///     is_active: true,
/// };
///
/// let merged = dedupe(vec![row(1, None), row(2, Some("Meat"))], &MergePolicy::default());
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].id, 1);
/// assert_eq!(merged[0].category.as_deref(), Some("Meat"));
/// ```
pub fn dedupe(rows: Vec<ProductRow>, policy: &MergePolicy) -> Vec<ProductRow> {
    let mut merged: Vec<ProductRow> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for mut row in rows {
        row.category = non_blank(row.category);

        let key = (row.item_code.clone(), row.vendor.clone());
        match index.get(&key) {
            Some(&slot) => {
                let seed = &mut merged[slot];
                policy.category.apply(&mut seed.category, &row.category);
                policy.unit.apply(&mut seed.uom_id, &row.uom_id);
                policy.price.apply(&mut seed.price_cents, &row.price_cents);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(row);
            }
        }
    }

    merged
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
