//! # Product Repository
//!
//! Read paths over `products`, plus a single-row insert for fixtures and
//! the seed binary.
//!
//! ## Bounded Fetch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SELECT p.* FROM products p                                            │
//! │  [LEFT JOIN uom u ON u.id = p.uom_id]   ← only when sorting by unit    │
//! │  WHERE  p.is_active = 1 AND (...) AND (...) [AND p.vendor = ?]         │
//! │  ORDER BY <field> <dir>, p.id ASC                                      │
//! │           unit: COALESCE(NULLIF(u.code, ''), <fallback>)                │
//! │  LIMIT ?                                ← fetch cap (10,000)           │
//! │                                                                         │
//! │  Every row comes back, duplicates included. Merging happens in         │
//! │  catalog-core, after the fetch.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::bind_query_as;
use crate::error::{DbError, DbResult};
use catalog_core::{CompiledQuery, DuplicateGroup, ProductRow, SqlParam, VendorCount};

/// A product row to insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub item_code: String,
    pub description: String,
    pub price_cents: Option<i64>,
    pub vendor: String,
    pub category: Option<String>,
    pub uom_id: Option<i64>,
    pub is_active: bool,
}

impl NewProduct {
    /// An active, unpriced product with no category or unit.
    pub fn new(
        item_code: impl Into<String>,
        description: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        NewProduct {
            item_code: item_code.into(),
            description: description.into(),
            vendor: vendor.into(),
            is_active: true,
            ..Default::default()
        }
    }

    pub fn price_cents(mut self, cents: i64) -> Self {
        self.price_cents = Some(cents);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn uom_id(mut self, uom_id: i64) -> Self {
        self.uom_id = Some(uom_id);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Fetches up to `limit` raw rows matching `compiled`, in sort order.
    ///
    /// A unit sort joins `uom`. When that table is missing, every row
    /// resolves to the fallback code, so the fetch runs again without the
    /// join instead of failing.
    pub async fn fetch_matching(
        &self,
        compiled: &CompiledQuery,
        limit: u32,
    ) -> DbResult<Vec<ProductRow>> {
        match self.fetch_rows(compiled, limit).await {
            Err(DbError::MissingTable(table)) if compiled.joins_uom && table == "uom" => {
                warn!("uom table missing, unit sort falls back to id order");
                self.fetch_rows(&compiled.without_uom_join(), limit).await
            }
            result => result,
        }
    }

    async fn fetch_rows(&self, compiled: &CompiledQuery, limit: u32) -> DbResult<Vec<ProductRow>> {
        let join = if compiled.joins_uom {
            " LEFT JOIN uom u ON u.id = p.uom_id"
        } else {
            ""
        };
        let sql = format!(
            "SELECT p.id, p.item_code, p.description, p.price_cents, p.vendor, \
             p.category, p.uom_id, p.is_active \
             FROM products p{} WHERE {} ORDER BY {} LIMIT ?",
            join, compiled.predicate, compiled.order_clause
        );

        let mut params = compiled.bind_params();
        params.push(SqlParam::Integer(i64::from(limit)));

        debug!(sql = %sql, params = params.len(), "Fetching matching products");

        let rows = bind_query_as(sqlx::query_as::<_, ProductRow>(&sql), &params)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetch returned rows");
        Ok(rows)
    }

    /// Distinct non-empty vendors of active products, alphabetically.
    pub async fn list_vendors(&self) -> DbResult<Vec<String>> {
        let vendors = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT vendor FROM products \
             WHERE is_active = 1 AND vendor <> '' \
             ORDER BY vendor",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    /// Active product counts per vendor, largest first.
    pub async fn vendor_counts(&self) -> DbResult<Vec<VendorCount>> {
        let counts = sqlx::query_as::<_, VendorCount>(
            "SELECT vendor, COUNT(*) AS count FROM products \
             WHERE is_active = 1 \
             GROUP BY vendor \
             ORDER BY count DESC, vendor ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Number of active product rows (duplicates included).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Dedup keys that occur on more than one row, most repeated first.
    ///
    /// Inactive rows are included; this is an import-hygiene report.
    pub async fn find_duplicates(&self) -> DbResult<Vec<DuplicateGroup>> {
        let groups = sqlx::query_as::<_, DuplicateGroup>(
            "SELECT item_code, vendor, COUNT(*) AS count FROM products \
             GROUP BY item_code, vendor \
             HAVING COUNT(*) > 1 \
             ORDER BY count DESC, item_code, vendor",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Inserts one product and returns its id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO products \
             (item_code, description, price_cents, vendor, category, uom_id, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.item_code)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.vendor)
        .bind(&product.category)
        .bind(product.uom_id)
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use catalog_core::{QueryBuilder, SortField, SortOrder};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();
        for product in [
            NewProduct::new("X100", "Angus beef patty", "Sysco").price_cents(410),
            NewProduct::new("X100", "Angus beef patty", "Sysco").category("Meat"),
            NewProduct::new("X100", "Angus beef patty", "US Foods"),
            NewProduct::new("B200", "Beef broth", "Sysco"),
            NewProduct::new("Z900", "Retired beef item", "Sysco").inactive(),
            NewProduct::new("N000", "No vendor row", ""),
        ] {
            products.insert(&product).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_fetch_matching_excludes_inactive() {
        let db = setup().await;
        let compiled =
            QueryBuilder::new().build("beef", None, SortField::ItemCode, SortOrder::Asc);
        let rows = db.products().fetch_matching(&compiled, 100).await.unwrap();

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.is_active));
        assert_eq!(rows[0].item_code, "B200");
    }

    #[tokio::test]
    async fn test_unit_sort_without_uom_table() {
        let db = setup().await;
        sqlx::query("DROP TABLE uom").execute(db.pool()).await.unwrap();

        let compiled = QueryBuilder::new().build("beef", None, SortField::Unit, SortOrder::Desc);
        let rows = db.products().fetch_matching(&compiled, 100).await.unwrap();

        assert_eq!(rows.len(), 4);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_missing_products_table_still_fails_unit_sort() {
        let db = setup().await;
        sqlx::query("DROP TABLE products").execute(db.pool()).await.unwrap();

        let compiled = QueryBuilder::new().build("", None, SortField::Unit, SortOrder::Asc);
        let err = db.products().fetch_matching(&compiled, 10).await.unwrap_err();
        assert!(matches!(err, DbError::MissingTable(ref table) if table == "products"));
    }

    #[tokio::test]
    async fn test_fetch_matching_respects_limit() {
        let db = setup().await;
        let compiled = QueryBuilder::new().build("", None, SortField::Description, SortOrder::Asc);
        let rows = db.products().fetch_matching(&compiled, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_vendor_listing_and_counts() {
        let db = setup().await;
        let products = db.products();

        assert_eq!(products.list_vendors().await.unwrap(), vec!["Sysco", "US Foods"]);
        assert_eq!(products.count_active().await.unwrap(), 5);

        let counts = products.vendor_counts().await.unwrap();
        assert_eq!(
            counts[0],
            VendorCount {
                vendor: "Sysco".into(),
                count: 3
            }
        );
        assert_eq!(counts.len(), 3);
    }

    #[tokio::test]
    async fn test_find_duplicates() {
        let db = setup().await;
        let groups = db.products().find_duplicates().await.unwrap();
        assert_eq!(
            groups,
            vec![DuplicateGroup {
                item_code: "X100".into(),
                vendor: "Sysco".into(),
                count: 2
            }]
        );
    }
}
