//! # Search Configuration Precedence
//!
//! Administrators store per-table search configs (which columns to show,
//! which to search, how to label them). A config can be global for a table
//! or scoped to e.g. one vendor.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve("products", "vendor", "Sysco")                                 │
//! │       │                                                                 │
//! │       ├── ScopeOverride  (products, vendor, Sysco)   ← most specific   │
//! │       │        │ missing                                               │
//! │       ├── TableOverride  (products, global)                            │
//! │       │        │ missing                                               │
//! │       └── Default        derived from the table's schema               │
//! │                │ no columns either                                     │
//! │                └── None                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing config storage is never fatal: the caller passes an empty entry
//! list and resolution lands on the schema default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scope type stored for table-wide configs.
pub const GLOBAL_SCOPE: &str = "global";

// =============================================================================
// Stored Config
// =============================================================================

/// The JSON blob stored in `search_config.config_json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub display_columns: Vec<String>,
    pub search_columns: Vec<String>,
    pub column_labels: BTreeMap<String, String>,
}

impl SearchConfig {
    /// Parses a stored JSON blob. Unknown keys are ignored.
    pub fn from_json(json: &str) -> serde_json::Result<SearchConfig> {
        serde_json::from_str(json)
    }
}

/// Where a stored config applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigScope {
    /// Table-wide (`scope_type = 'global'`).
    Global,
    /// Narrowed to one scope, e.g. (`vendor`, `Sysco`).
    Scoped {
        scope_type: String,
        scope_value: Option<String>,
    },
}

impl ConfigScope {
    /// Builds a scope from the stored column pair.
    pub fn from_columns(scope_type: &str, scope_value: Option<String>) -> ConfigScope {
        if scope_type == GLOBAL_SCOPE {
            ConfigScope::Global
        } else {
            ConfigScope::Scoped {
                scope_type: scope_type.to_string(),
                scope_value,
            }
        }
    }

    fn matches(&self, scope_type: &str, scope_value: Option<&str>) -> bool {
        match self {
            ConfigScope::Global => false,
            ConfigScope::Scoped {
                scope_type: stored_type,
                scope_value: stored_value,
            } => stored_type == scope_type && stored_value.as_deref() == scope_value,
        }
    }
}

/// One row of `search_config`, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfigEntry {
    pub table_name: String,
    pub scope: ConfigScope,
    pub config: SearchConfig,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Schema Introspection Input
// =============================================================================

/// One column as reported by the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared SQL type, e.g. `TEXT`, `VARCHAR(64)`, `INTEGER`.
    pub declared_type: String,
}

impl ColumnInfo {
    /// Text-typed columns are the generic search targets.
    pub fn is_text(&self) -> bool {
        let declared = self.declared_type.to_ascii_uppercase();
        declared.contains("CHAR") || declared.contains("TEXT") || declared.contains("CLOB")
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// The winning config and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConfig {
    /// A config stored for exactly the requested scope.
    ScopeOverride(SearchConfig),
    /// The table's global config.
    TableOverride(SearchConfig),
    /// Derived from schema: all columns displayed, text columns searched.
    Default(SearchConfig),
}

impl ResolvedConfig {
    pub fn config(&self) -> &SearchConfig {
        match self {
            ResolvedConfig::ScopeOverride(config)
            | ResolvedConfig::TableOverride(config)
            | ResolvedConfig::Default(config) => config,
        }
    }

    pub fn into_config(self) -> SearchConfig {
        match self {
            ResolvedConfig::ScopeOverride(config)
            | ResolvedConfig::TableOverride(config)
            | ResolvedConfig::Default(config) => config,
        }
    }

    /// Short name of the precedence level, for logs.
    pub fn origin(&self) -> &'static str {
        match self {
            ResolvedConfig::ScopeOverride(_) => "scope",
            ResolvedConfig::TableOverride(_) => "table",
            ResolvedConfig::Default(_) => "schema",
        }
    }
}

/// Config derived from schema alone.
pub fn schema_default(columns: &[ColumnInfo]) -> SearchConfig {
    SearchConfig {
        display_columns: columns.iter().map(|c| c.name.clone()).collect(),
        search_columns: columns
            .iter()
            .filter(|c| c.is_text())
            .map(|c| c.name.clone())
            .collect(),
        column_labels: BTreeMap::new(),
    }
}

/// Picks the config for (`table`, `scope_type`, `scope_value`).
///
/// ## Rules
/// - `entries` for other tables are ignored
/// - A scope request of `None` or `"global"` skips the scoped level
/// - When several entries share a level, the latest `updated_at` wins
/// - Returns `None` only when nothing is stored and `schema` is empty
///
/// ## Example
/// ```rust
/// use catalog_core::config::{resolve, ColumnInfo, ResolvedConfig};
///
/// let schema = vec![
///     ColumnInfo { name: "id".into(), declared_type: "INTEGER".into() },
///     ColumnInfo { name: "code".into(), declared_type: "TEXT".into() },
/// ];
///
/// let resolved = resolve(&[], "uom", None, None, &schema).unwrap();
/// assert!(matches!(resolved, ResolvedConfig::Default(_)));
/// assert_eq!(resolved.config().search_columns, vec!["code"]);
/// ```
pub fn resolve(
    entries: &[SearchConfigEntry],
    table: &str,
    scope_type: Option<&str>,
    scope_value: Option<&str>,
    schema: &[ColumnInfo],
) -> Option<ResolvedConfig> {
    let for_table = || entries.iter().filter(|e| e.table_name == table);

    if let Some(scope_type) = scope_type.filter(|s| *s != GLOBAL_SCOPE) {
        let scoped = for_table()
            .filter(|e| e.scope.matches(scope_type, scope_value))
            .max_by_key(|e| e.updated_at);
        if let Some(entry) = scoped {
            return Some(ResolvedConfig::ScopeOverride(entry.config.clone()));
        }
    }

    let global = for_table()
        .filter(|e| e.scope == ConfigScope::Global)
        .max_by_key(|e| e.updated_at);
    if let Some(entry) = global {
        return Some(ResolvedConfig::TableOverride(entry.config.clone()));
    }

    if schema.is_empty() {
        return None;
    }
    Some(ResolvedConfig::Default(schema_default(schema)))
}

/// Drops stored column names the schema does not have.
///
/// A list that ends up empty falls back to the schema-derived list, so a
/// stale config can never produce an empty SELECT. Labels are kept as-is.
pub fn reconcile_with_schema(config: SearchConfig, schema: &[ColumnInfo]) -> SearchConfig {
    let default = schema_default(schema);
    let known = |name: &String| schema.iter().any(|c| &c.name == name);

    let display: Vec<String> = config.display_columns.into_iter().filter(known).collect();
    let search: Vec<String> = config.search_columns.into_iter().filter(known).collect();

    SearchConfig {
        display_columns: if display.is_empty() {
            default.display_columns
        } else {
            display
        },
        search_columns: if search.is_empty() {
            default.search_columns
        } else {
            search
        },
        column_labels: config.column_labels,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config(display: &[&str]) -> SearchConfig {
        SearchConfig {
            display_columns: display.iter().map(|s| s.to_string()).collect(),
            search_columns: vec![],
            column_labels: BTreeMap::new(),
        }
    }

    fn entry(table: &str, scope: ConfigScope, display: &[&str], ts: i64) -> SearchConfigEntry {
        SearchConfigEntry {
            table_name: table.to_string(),
            scope,
            config: config(display),
            updated_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    fn vendor_scope(value: &str) -> ConfigScope {
        ConfigScope::Scoped {
            scope_type: "vendor".into(),
            scope_value: Some(value.into()),
        }
    }

    fn schema() -> Vec<ColumnInfo> {
        vec![
            ColumnInfo {
                name: "id".into(),
                declared_type: "INTEGER".into(),
            },
            ColumnInfo {
                name: "item_code".into(),
                declared_type: "VARCHAR(64)".into(),
            },
            ColumnInfo {
                name: "description".into(),
                declared_type: "TEXT".into(),
            },
        ]
    }

    #[test]
    fn test_scope_beats_table_beats_schema() {
        let entries = vec![
            entry("products", ConfigScope::Global, &["item_code"], 1),
            entry("products", vendor_scope("Sysco"), &["description"], 1),
        ];

        let scoped = resolve(&entries, "products", Some("vendor"), Some("Sysco"), &schema());
        assert_eq!(
            scoped,
            Some(ResolvedConfig::ScopeOverride(config(&["description"])))
        );

        let other_vendor = resolve(&entries, "products", Some("vendor"), Some("Acme"), &schema());
        assert_eq!(
            other_vendor,
            Some(ResolvedConfig::TableOverride(config(&["item_code"])))
        );

        let no_scope = resolve(&entries, "products", None, None, &schema());
        assert_eq!(no_scope.unwrap().origin(), "table");

        let other_table = resolve(&entries, "uom", Some("vendor"), Some("Sysco"), &schema());
        assert_eq!(other_table.unwrap().origin(), "schema");
    }

    #[test]
    fn test_missing_storage_falls_back_to_schema() {
        let resolved = resolve(&[], "products", Some("vendor"), Some("Sysco"), &schema()).unwrap();
        let config = resolved.config();
        assert_eq!(config.display_columns, vec!["id", "item_code", "description"]);
        assert_eq!(config.search_columns, vec!["item_code", "description"]);
    }

    #[test]
    fn test_nothing_at_all_is_none() {
        assert_eq!(resolve(&[], "ghost", None, None, &[]), None);
    }

    #[test]
    fn test_latest_entry_wins_within_a_level() {
        let entries = vec![
            entry("products", ConfigScope::Global, &["old"], 10),
            entry("products", ConfigScope::Global, &["new"], 20),
            entry("products", ConfigScope::Global, &["older"], 5),
        ];
        let resolved = resolve(&entries, "products", None, None, &schema()).unwrap();
        assert_eq!(resolved.into_config().display_columns, vec!["new"]);
    }

    #[test]
    fn test_null_scope_value_matches_only_null() {
        let entries = vec![entry(
            "products",
            ConfigScope::Scoped {
                scope_type: "role".into(),
                scope_value: None,
            },
            &["description"],
            1,
        )];
        let hit = resolve(&entries, "products", Some("role"), None, &schema()).unwrap();
        assert_eq!(hit.origin(), "scope");

        let miss = resolve(&entries, "products", Some("role"), Some("admin"), &schema()).unwrap();
        assert_eq!(miss.origin(), "schema");
    }

    #[test]
    fn test_global_scope_request_skips_scoped_level() {
        let entries = vec![entry("products", ConfigScope::Global, &["item_code"], 1)];
        let resolved = resolve(&entries, "products", Some("global"), None, &schema()).unwrap();
        assert_eq!(resolved.origin(), "table");
    }

    #[test]
    fn test_config_json_parsing() {
        let parsed = SearchConfig::from_json(
            r#"{"display_columns":["item_code"],"column_labels":{"item_code":"Code"},"extra":1}"#,
        )
        .unwrap();
        assert_eq!(parsed.display_columns, vec!["item_code"]);
        assert!(parsed.search_columns.is_empty());
        assert_eq!(parsed.column_labels["item_code"], "Code");

        assert!(SearchConfig::from_json("not json").is_err());
        assert_eq!(
            ConfigScope::from_columns("global", Some("ignored".into())),
            ConfigScope::Global
        );
    }

    #[test]
    fn test_reconcile_with_schema() {
        let stored = SearchConfig {
            display_columns: vec!["item_code".into(), "dropped_col".into()],
            search_columns: vec!["gone".into()],
            column_labels: BTreeMap::from([("item_code".to_string(), "Code".to_string())]),
        };
        let reconciled = reconcile_with_schema(stored, &schema());
        assert_eq!(reconciled.display_columns, vec!["item_code"]);
        assert_eq!(reconciled.search_columns, vec!["item_code", "description"]);
        assert_eq!(reconciled.column_labels["item_code"], "Code");
    }
}
