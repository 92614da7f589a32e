//! # Request Normalization
//!
//! Search requests are never rejected for bad paging or sort options. Every
//! loose field is corrected to a safe value before any SQL is built.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────┐
//! │  Incoming                │  Normalized                              │
//! ├──────────────────────────┼──────────────────────────────────────────┤
//! │  page < 1 / absent       │  1                                       │
//! │  perPage ≤ 0 / absent    │  settings.default_per_page (100)         │
//! │  sortField not in list   │  description, and sortOrder forced ASC   │
//! │  sortOrder != "DESC"     │  ASC                                     │
//! │  table empty / absent    │  settings.catalog_table ("products")     │
//! │  vendor blank            │  no vendor filter (else kept verbatim)   │
//! └──────────────────────────┴──────────────────────────────────────────┘
//! ```

use crate::settings::SearchSettings;
use crate::types::{SearchRequest, SortField, SortOrder};

/// A request with every field corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSearch {
    pub query: String,
    pub vendor: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
    pub table: String,
    pub scope_type: Option<String>,
    pub scope_value: Option<String>,
}

impl NormalizedSearch {
    /// True when the caller asked for scope-aware config resolution.
    pub fn has_scope(&self) -> bool {
        self.scope_type.is_some()
    }
}

/// Corrects `request` against `settings`. Never fails.
///
/// ## Example
/// ```rust
/// use catalog_core::settings::SearchSettings;
/// use catalog_core::types::{SearchRequest, SortField, SortOrder};
/// use catalog_core::validation::normalize_search;
///
/// let mut request = SearchRequest::new("beef");
/// request.sort_field = Some("bogus".into());
/// request.sort_order = Some("DESC".into());
/// request.page = Some(-3);
///
/// let normalized = normalize_search(&request, &SearchSettings::default());
/// assert_eq!(normalized.sort_field, SortField::Description);
/// assert_eq!(normalized.sort_order, SortOrder::Asc);
/// assert_eq!(normalized.page, 1);
/// assert_eq!(normalized.per_page, 100);
/// ```
pub fn normalize_search(request: &SearchRequest, settings: &SearchSettings) -> NormalizedSearch {
    let requested_order = request
        .sort_order
        .as_deref()
        .map(SortOrder::coerce)
        .unwrap_or_default();

    let (sort_field, sort_order) = match request.sort_field.as_deref() {
        None => (SortField::default(), requested_order),
        Some(raw) => match SortField::parse(raw) {
            Some(field) => (field, requested_order),
            None => (SortField::Description, SortOrder::Asc),
        },
    };

    let page = match request.page {
        Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
        _ => 1,
    };

    let per_page = match request.per_page {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => settings.default_per_page,
    };

    NormalizedSearch {
        query: request.query.trim().to_string(),
        vendor: request
            .vendor
            .clone()
            .filter(|vendor| !vendor.trim().is_empty()),
        sort_field,
        sort_order,
        page,
        per_page,
        table: non_blank(request.table.as_deref())
            .unwrap_or_else(|| settings.catalog_table.clone()),
        scope_type: non_blank(request.scope_type.as_deref()),
        scope_value: non_blank(request.scope_value.as_deref()),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(request: &SearchRequest) -> NormalizedSearch {
        normalize_search(request, &SearchSettings::default())
    }

    #[test]
    fn test_defaults() {
        let n = normalize(&SearchRequest::new("  beef "));
        assert_eq!(n.query, "beef");
        assert_eq!(n.vendor, None);
        assert_eq!(n.sort_field, SortField::Description);
        assert_eq!(n.sort_order, SortOrder::Asc);
        assert_eq!(n.page, 1);
        assert_eq!(n.per_page, 100);
        assert_eq!(n.table, "products");
        assert!(!n.has_scope());
    }

    #[test]
    fn test_valid_sort_keeps_order() {
        let mut request = SearchRequest::new("beef");
        request.sort_field = Some("price".into());
        request.sort_order = Some("DESC".into());
        let n = normalize(&request);
        assert_eq!(n.sort_field, SortField::Price);
        assert_eq!(n.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_order_is_ascending() {
        let mut request = SearchRequest::new("beef");
        request.sort_field = Some("vendor".into());
        request.sort_order = Some("sideways".into());
        assert_eq!(normalize(&request).sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_paging_corrections() {
        let mut request = SearchRequest::new("");
        request.page = Some(0);
        request.per_page = Some(-5);
        let n = normalize(&request);
        assert_eq!(n.page, 1);
        assert_eq!(n.per_page, 100);

        request.page = Some(7);
        request.per_page = Some(25);
        let n = normalize(&request);
        assert_eq!(n.page, 7);
        assert_eq!(n.per_page, 25);

        request.page = Some(i64::MAX);
        assert_eq!(normalize(&request).page, u32::MAX);
    }

    #[test]
    fn test_configured_default_per_page() {
        let settings = SearchSettings {
            default_per_page: 40,
            ..SearchSettings::default()
        };
        let n = normalize_search(&SearchRequest::new("x"), &settings);
        assert_eq!(n.per_page, 40);
    }

    #[test]
    fn test_blank_strings_become_none() {
        let mut request = SearchRequest::new("x");
        request.vendor = Some("   ".into());
        request.table = Some("".into());
        request.scope_type = Some("vendor".into());
        request.scope_value = Some(" Sysco ".into());
        let n = normalize(&request);
        assert_eq!(n.vendor, None);
        assert_eq!(n.table, "products");
        assert_eq!(n.scope_type.as_deref(), Some("vendor"));
        assert_eq!(n.scope_value.as_deref(), Some("Sysco"));
    }

    #[test]
    fn test_vendor_is_kept_verbatim() {
        let mut request = SearchRequest::new("x");
        request.vendor = Some(" Sysco ".into());
        assert_eq!(normalize(&request).vendor.as_deref(), Some(" Sysco "));
    }
}
