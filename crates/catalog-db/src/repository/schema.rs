//! # Schema Repository
//!
//! Schema introspection and generic column-list browsing for tables that
//! have no dedicated repository.

use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::bind_query;
use crate::error::DbResult;
use catalog_core::config::ColumnInfo;
use catalog_core::query::BrowseQuery;

#[derive(Debug, Clone)]
pub struct SchemaRepository {
    pool: SqlitePool,
}

impl SchemaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SchemaRepository { pool }
    }

    /// User tables, alphabetically. Internal SQLite and migration tables
    /// are left out.
    pub async fn list_tables(&self) -> DbResult<Vec<String>> {
        let tables = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' \
             AND name NOT GLOB 'sqlite_*' \
             AND name NOT GLOB '_sqlx_*' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Columns of `table` in declaration order. Empty when the table does
    /// not exist.
    pub async fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let columns = sqlx::query_as::<_, (String, String)>(
            "SELECT name, type FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        Ok(columns
            .into_iter()
            .map(|(name, declared_type)| ColumnInfo {
                name,
                declared_type,
            })
            .collect())
    }

    /// Runs a browse query. Every selected value is TEXT or NULL.
    pub async fn browse(&self, query: &BrowseQuery) -> DbResult<Vec<Map<String, Value>>> {
        debug!(sql = %query.sql, "Browsing table");

        let rows = bind_query(sqlx::query(&query.sql), &query.params)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = Map::new();
            for (index, column) in query.columns.iter().enumerate() {
                let value: Option<String> = row.try_get(index)?;
                record.insert(column.clone(), value.map_or(Value::Null, Value::String));
            }
            out.push(record);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use catalog_core::query::build_browse;

    #[tokio::test]
    async fn test_list_tables_hides_internal_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.schema().list_tables().await.unwrap();
        assert_eq!(tables, vec!["products", "search_config", "uom"]);
    }

    #[tokio::test]
    async fn test_table_columns() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let columns = db.schema().table_columns("uom").await.unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "code"]);
        assert!(!columns[0].is_text());
        assert!(columns[1].is_text());

        assert!(db.schema().table_columns("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_browse_renders_text_and_null() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO products (item_code, description, price_cents) VALUES ('A1', 'Apple pie', 350)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO products (item_code, description) VALUES ('B2', 'Banana')")
            .execute(db.pool())
            .await
            .unwrap();

        let columns = vec!["item_code".to_string(), "price_cents".to_string()];
        let search = vec!["description".to_string()];
        let query = build_browse("products", &columns, &search, "pie", 10).unwrap();

        let rows = db.schema().browse(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["item_code"], "A1");
        assert_eq!(rows[0]["price_cents"], "350");

        let all = build_browse("products", &columns, &search, "", 10).unwrap();
        let rows = db.schema().browse(&all).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1]["price_cents"].is_null());
    }
}
