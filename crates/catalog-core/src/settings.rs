//! Search tunables, injected once at process start.

use serde::{Deserialize, Serialize};

use crate::dedup::MergePolicy;
use crate::{
    CATALOG_TABLE, DEFAULT_BROWSE_LIMIT, DEFAULT_FETCH_LIMIT, DEFAULT_PER_PAGE, FALLBACK_UOM_CODE,
};

/// Knobs the search path reads on every request.
///
/// Built by the app layer (file + environment) and passed in by reference;
/// nothing here is read from global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Rows per page when the request does not specify one.
    pub default_per_page: u32,
    /// Cap on raw rows fetched before deduplication.
    pub fetch_limit: u32,
    /// The table with text-search support.
    pub catalog_table: String,
    /// Unit code for rows without a resolvable unit.
    pub fallback_uom_code: String,
    pub merge_policy: MergePolicy,
    /// Upper bound on one data-store call, in milliseconds.
    pub query_timeout_ms: u64,
    /// Row cap for generic browsing.
    pub browse_limit: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            default_per_page: DEFAULT_PER_PAGE,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            catalog_table: CATALOG_TABLE.to_string(),
            fallback_uom_code: FALLBACK_UOM_CODE.to_string(),
            merge_policy: MergePolicy::default(),
            query_timeout_ms: 10_000,
            browse_limit: DEFAULT_BROWSE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::FieldMerge;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: SearchSettings = serde_json::from_str(
            r#"{"default_per_page":25,"merge_policy":{"price":"prefer_latest"}}"#,
        )
        .unwrap();
        assert_eq!(settings.default_per_page, 25);
        assert_eq!(settings.fetch_limit, 10_000);
        assert_eq!(settings.catalog_table, "products");
        assert_eq!(settings.merge_policy.price, FieldMerge::PreferLatest);
        assert_eq!(settings.merge_policy.category, FieldMerge::FillIfEmpty);
    }
}
