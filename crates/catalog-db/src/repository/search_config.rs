//! # Search Config Repository
//!
//! Reads stored config rows for one table. Precedence between them is
//! decided in `catalog_core::config`, not here.
//!
//! ## Failure Handling
//! ```text
//! search_config table missing   → Ok(vec![])  + warn
//! config_json not valid JSON    → row skipped + warn
//! anything else                 → Err(DbError)
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use catalog_core::{ConfigScope, SearchConfig, SearchConfigEntry};

#[derive(Debug, FromRow)]
struct ConfigRow {
    table_name: String,
    scope_type: String,
    scope_value: Option<String>,
    config_json: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SearchConfigRepository {
    pool: SqlitePool,
}

impl SearchConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SearchConfigRepository { pool }
    }

    /// All decodable config entries stored for `table`.
    pub async fn entries_for(&self, table: &str) -> DbResult<Vec<SearchConfigEntry>> {
        let rows = sqlx::query_as::<_, ConfigRow>(
            "SELECT table_name, scope_type, scope_value, config_json, updated_at \
             FROM search_config WHERE table_name = ?",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await;

        let rows = match rows {
            Ok(rows) => rows,
            Err(err) => {
                let err = DbError::from(err);
                if err.is_missing_table() {
                    warn!(table = %table, "search_config table missing, using schema defaults");
                    return Ok(Vec::new());
                }
                return Err(err);
            }
        };

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match SearchConfig::from_json(&row.config_json) {
                Ok(config) => entries.push(SearchConfigEntry {
                    table_name: row.table_name,
                    scope: ConfigScope::from_columns(&row.scope_type, row.scope_value),
                    config,
                    updated_at: row.updated_at,
                }),
                Err(err) => warn!(
                    table = %table,
                    scope_type = %row.scope_type,
                    error = %err,
                    "Skipping malformed search config row"
                ),
            }
        }

        debug!(table = %table, count = entries.len(), "Loaded search config entries");
        Ok(entries)
    }

    /// Stores one config entry and returns its row id.
    pub async fn insert(&self, entry: &SearchConfigEntry) -> DbResult<i64> {
        let config_json = serde_json::to_string(&entry.config)
            .map_err(|e| DbError::Internal(format!("Failed to encode search config: {}", e)))?;

        let (scope_type, scope_value) = match &entry.scope {
            ConfigScope::Global => (catalog_core::config::GLOBAL_SCOPE, None),
            ConfigScope::Scoped {
                scope_type,
                scope_value,
            } => (scope_type.as_str(), scope_value.as_deref()),
        };

        let result = sqlx::query(
            "INSERT INTO search_config \
             (table_name, scope_type, scope_value, config_json, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&entry.table_name)
        .bind(scope_type)
        .bind(scope_value)
        .bind(config_json)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;

    fn entry(scope: ConfigScope, display: &[&str], ts: i64) -> SearchConfigEntry {
        SearchConfigEntry {
            table_name: "products".into(),
            scope,
            config: SearchConfig {
                display_columns: display.iter().map(|s| s.to_string()).collect(),
                ..SearchConfig::default()
            },
            updated_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_entries_round_trip_through_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.search_configs();
        repo.insert(&entry(ConfigScope::Global, &["item_code"], 100))
            .await
            .unwrap();
        repo.insert(&entry(
            ConfigScope::Scoped {
                scope_type: "vendor".into(),
                scope_value: Some("Sysco".into()),
            },
            &["description"],
            200,
        ))
        .await
        .unwrap();

        let entries = repo.entries_for("products").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.scope == ConfigScope::Global));
        assert!(entries
            .iter()
            .any(|e| e.updated_at == Utc.timestamp_opt(200, 0).unwrap()));

        assert!(repo.entries_for("uom").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO search_config (table_name, scope_type, config_json) \
             VALUES ('products', 'global', '{not json')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(db.search_configs().entries_for("products").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_is_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("DROP TABLE search_config")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.search_configs().entries_for("products").await.unwrap().is_empty());
    }
}
