//! # Domain Types
//!
//! Core domain types used throughout the catalog search backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ProductRow    │   │  SearchRequest  │   │ SearchResponse  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  item_code      │   │  query          │   │  results[]      │       │
//! │  │  vendor         │   │  vendor?        │   │  total          │       │
//! │  │  price_cents?   │   │  sortField?     │   │  page           │       │
//! │  │  uom_id?        │   │  page/perPage?  │   │  totalPages     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   SortField     │   │   SortOrder     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  ItemCode ...   │   │  Asc            │                             │
//! │  │  Unit (joined)  │   │  Desc           │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Identity
//! `item_code` alone is NOT unique. Repeated vendor imports produce several
//! rows per (`item_code`, `vendor`) pair; see [`crate::dedup`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Row
// =============================================================================

/// One raw row of the `products` table as fetched for search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductRow {
    /// Surrogate key. Only used as a stable sort tie-breaker.
    pub id: i64,

    /// Vendor item code. Not unique on its own.
    pub item_code: String,

    /// Free-text description.
    pub description: String,

    /// Price in cents, `None` when the import had no price.
    pub price_cents: Option<i64>,

    /// Vendor (distribution center) name. Empty when unknown.
    pub vendor: String,

    /// Product category, often missing on older imports.
    pub category: Option<String>,

    /// Reference into the `uom` table.
    pub uom_id: Option<i64>,

    /// Inactive rows never reach search results.
    pub is_active: bool,
}

impl ProductRow {
    /// The (item_code, vendor) pair identifying one logical product.
    #[inline]
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.item_code, &self.vendor)
    }

    /// Returns the price as Money, if any.
    #[inline]
    pub fn price(&self) -> Option<Money> {
        self.price_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Whitelisted sort columns.
///
/// Anything outside this list is replaced by [`SortField::Description`]
/// during request normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    ItemCode,
    #[default]
    Description,
    Price,
    Vendor,
    Category,
    /// Sorts by the joined unit code, not the raw `uom_id`.
    Unit,
}

impl SortField {
    /// Parses a wire value. Exact, case-sensitive match on the whitelist.
    pub fn parse(value: &str) -> Option<SortField> {
        match value {
            "item_code" => Some(SortField::ItemCode),
            "description" => Some(SortField::Description),
            "price" => Some(SortField::Price),
            "vendor" => Some(SortField::Vendor),
            "category" => Some(SortField::Category),
            "unit" => Some(SortField::Unit),
            _ => None,
        }
    }

    /// The qualified column this field sorts on.
    pub const fn column(&self) -> &'static str {
        match self {
            SortField::ItemCode => "p.item_code",
            SortField::Description => "p.description",
            SortField::Price => "p.price_cents",
            SortField::Vendor => "p.vendor",
            SortField::Category => "p.category",
            SortField::Unit => "u.code",
        }
    }
}

/// Sort direction. Always rendered as exactly `ASC` or `DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `DESC` (exact) selects descending; everything else is ascending.
    pub fn coerce(value: &str) -> SortOrder {
        if value == "DESC" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// =============================================================================
// Search Request / Response
// =============================================================================

/// A search request as received from a collaborator (HTTP, CLI).
///
/// Every field except `query` is optional and loosely typed on purpose:
/// bad values are corrected by [`crate::validation::normalize_search`],
/// never rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: String,
    pub vendor: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    #[ts(type = "number | null")]
    pub page: Option<i64>,
    #[ts(type = "number | null")]
    pub per_page: Option<i64>,
    pub table: Option<String>,
    pub scope_type: Option<String>,
    pub scope_value: Option<String>,
}

impl SearchRequest {
    /// Creates a request for `query` with every option defaulted.
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// One product line in a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResultItem {
    pub item_code: String,
    pub description: String,
    /// Two-decimal string ("12.10"), `null` when unpriced.
    pub price: Option<String>,
    /// Resolved unit code, never empty.
    pub unit: String,
    pub vendor: String,
    pub category: Option<String>,
}

/// A successful search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchResponse {
    pub results: Vec<ResultItem>,
    /// Deduplicated rows matching the filters (not the raw row count).
    #[ts(type = "number")]
    pub total: u64,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    /// Display columns from the resolved search config, when one was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Column labels from the resolved search config.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

// =============================================================================
// Generic Browsing
// =============================================================================

/// Column-list browsing for tables without text-search logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseRequest {
    pub table: String,
    pub query: String,
    pub scope_type: Option<String>,
    pub scope_value: Option<String>,
    pub limit: Option<u32>,
}

/// Rows of an arbitrary table, every value rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrowseResponse {
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    pub columns: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub search_columns: Vec<String>,
}

// =============================================================================
// Catalog Diagnostics
// =============================================================================

/// Active product count for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VendorCount {
    pub vendor: String,
    #[ts(type = "number")]
    pub count: i64,
}

/// Active product totals, overall and per vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogSummary {
    #[ts(type = "number")]
    pub total: i64,
    pub vendors: Vec<VendorCount>,
}

/// A dedup key that occurs on more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DuplicateGroup {
    pub item_code: String,
    pub vendor: String,
    #[ts(type = "number")]
    pub count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_whitelist() {
        assert_eq!(SortField::parse("unit"), Some(SortField::Unit));
        assert_eq!(SortField::parse("price"), Some(SortField::Price));
        assert_eq!(SortField::parse("bogus"), None);
        assert_eq!(SortField::parse(""), None);
        assert_eq!(SortField::parse("Price"), None);
        assert_eq!(SortField::default(), SortField::Description);
    }

    #[test]
    fn test_sort_order_coercion() {
        assert_eq!(SortOrder::coerce("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::coerce("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::coerce("desc; DROP TABLE"), SortOrder::Asc);
        assert_eq!(SortOrder::coerce(""), SortOrder::Asc);
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: SearchRequest = serde_json::from_str(
            r#"{"query":"beef","sortField":"price","perPage":25,"scopeType":"vendor"}"#,
        )
        .unwrap();
        assert_eq!(request.query, "beef");
        assert_eq!(request.sort_field.as_deref(), Some("price"));
        assert_eq!(request.per_page, Some(25));
        assert_eq!(request.scope_type.as_deref(), Some("vendor"));
        assert_eq!(request.page, None);
    }

    #[test]
    fn test_response_wire_shape() {
        let response = SearchResponse {
            results: vec![],
            total: 0,
            page: 1,
            total_pages: 0,
            columns: vec![],
            labels: BTreeMap::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalPages"], 0);
        assert!(json.get("columns").is_none());
        assert!(json.get("labels").is_none());
    }
}
