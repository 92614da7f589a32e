//! # Unit of Measure Repository

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use catalog_core::UomTable;

#[derive(Debug, Clone)]
pub struct UomRepository {
    pool: SqlitePool,
}

impl UomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UomRepository { pool }
    }

    /// Loads the full id → code mapping.
    ///
    /// A missing `uom` table is not an error: the returned table is empty
    /// and every product resolves to the fallback code.
    pub async fn load_table(&self) -> DbResult<UomTable> {
        let pairs = sqlx::query_as::<_, (i64, String)>("SELECT id, code FROM uom")
            .fetch_all(&self.pool)
            .await;

        match pairs {
            Ok(pairs) => {
                debug!(count = pairs.len(), "Loaded unit of measure table");
                Ok(UomTable::from_pairs(pairs))
            }
            Err(err) => {
                let err = crate::DbError::from(err);
                if err.is_missing_table() {
                    warn!("uom table missing, every unit resolves to the fallback code");
                    Ok(UomTable::default())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Inserts a unit code and returns its id.
    pub async fn insert(&self, code: &str) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO uom (code) VALUES (?)")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_load_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cs = db.uoms().insert("CS").await.unwrap();
        let lb = db.uoms().insert("LB").await.unwrap();

        let table = db.uoms().load_table().await.unwrap();
        assert_eq!(table.resolve(Some(cs)), "CS");
        assert_eq!(table.resolve(Some(lb)), "LB");
        assert_eq!(table.resolve(Some(lb + 100)), "EA");
    }

    #[tokio::test]
    async fn test_missing_table_is_empty_mapping() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("DROP TABLE uom").execute(db.pool()).await.unwrap();

        let table = db.uoms().load_table().await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.resolve(Some(1)), "EA");
    }
}
