//! # Search Service
//!
//! The façade collaborators call. One `search` call is one request/response
//! cycle, walked through the phases in [`catalog_core::phase`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SearchRequest                                                          │
//! │       │                                                                 │
//! │  Validating     normalize_search()        corrects, never rejects      │
//! │       │         table != products ──────► UnsupportedTable             │
//! │  Building       QueryBuilder::build()                                  │
//! │       │         + config resolve (only when a scope is requested)      │
//! │  Executing      uom table + bounded fetch (under query timeout)        │
//! │       │         store error / timeout ──► Failed ──► DataStore         │
//! │  Deduplicating  dedupe(rows, merge_policy)                             │
//! │       │                                                                 │
//! │  Paginating     paginate() + unit codes + price strings                │
//! │       │                                                                 │
//! │  Done ──► SearchResponse                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request runs inside a `search` span carrying a fresh request id.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{DbError, DbResult, SearchError, SearchResult};
use crate::pool::Database;
use catalog_core::config::{self, ColumnInfo};
use catalog_core::query::{build_browse, validate_identifier};
use catalog_core::validation::normalize_search;
use catalog_core::{
    dedupe, paginate, BrowseRequest, BrowseResponse, CatalogSummary, DuplicateGroup, ProductRow,
    QueryBuilder, ResultItem, SearchConfig, SearchPhase, SearchRequest, SearchResponse,
    SearchSettings, UomTable,
};

// =============================================================================
// Phase Tracking
// =============================================================================

struct PhaseTracker {
    phase: SearchPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        PhaseTracker {
            phase: SearchPhase::Idle,
        }
    }

    fn advance(&mut self) {
        let next = self.phase.next();
        debug!(from = %self.phase, to = %next, "Search phase");
        self.phase = next;
    }

    fn fail(&mut self, err: &DbError) {
        if let Some(failed) = self.phase.fail() {
            warn!(from = %self.phase, error = %err, code = err.code(), "Search failed");
            self.phase = failed;
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Catalog search over a [`Database`], tuned by [`SearchSettings`].
///
/// ## Usage
/// ```rust,ignore
/// let service = SearchService::new(&db, &settings);
/// let response = service.search(&SearchRequest::new("angus beef")).await?;
/// println!("{} of {}", response.results.len(), response.total);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SearchService<'a> {
    db: &'a Database,
    settings: &'a SearchSettings,
}

impl<'a> SearchService<'a> {
    pub fn new(db: &'a Database, settings: &'a SearchSettings) -> Self {
        SearchService { db, settings }
    }

    /// Runs one text search against the catalog table.
    ///
    /// ## Errors
    /// - `UnsupportedTable` when `request.table` names any other table
    /// - `DataStore` when the fetch fails or exceeds the query timeout
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        let span = info_span!("search", request_id = %Uuid::new_v4());
        self.run_search(request).instrument(span).await
    }

    async fn run_search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        let started = Instant::now();
        let mut phase = PhaseTracker::new();

        phase.advance();
        let normalized = normalize_search(request, self.settings);
        if normalized.table != self.settings.catalog_table {
            warn!(table = %normalized.table, "Text search requested on unsupported table");
            return Err(SearchError::unsupported_table(normalized.table));
        }

        phase.advance();
        let compiled = QueryBuilder::new()
            .with_fallback_unit(&self.settings.fallback_uom_code)
            .build(
                &normalized.query,
                normalized.vendor.as_deref(),
                normalized.sort_field,
                normalized.sort_order,
            );
        debug!(
            predicate = %compiled.predicate,
            order = %compiled.order_clause,
            quoted = compiled.search.quoted,
            tokens = compiled.search.tokens.len(),
            "Compiled search query"
        );

        let config = if normalized.has_scope() {
            let schema = self.schema_or_empty(&normalized.table).await;
            self.resolve_config(
                &normalized.table,
                normalized.scope_type.as_deref(),
                normalized.scope_value.as_deref(),
                &schema,
            )
            .await
        } else {
            None
        };

        phase.advance();
        let fetch_limit = self.settings.fetch_limit;
        let fetched = self
            .with_timeout(async {
                let uoms = self.db.uoms().load_table().await?;
                let rows = self.db.products().fetch_matching(&compiled, fetch_limit).await?;
                Ok::<_, DbError>((uoms, rows))
            })
            .await;
        let (uoms, rows) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                phase.fail(&err);
                return Err(err.into());
            }
        };

        let raw_rows = rows.len();
        if raw_rows >= fetch_limit as usize {
            warn!(
                fetch_limit = fetch_limit,
                "Fetch cap reached, totals may be understated"
            );
        }

        phase.advance();
        let unique = dedupe(rows, &self.settings.merge_policy);

        phase.advance();
        let page = paginate(unique, normalized.page, normalized.per_page);
        let uoms = uoms.with_fallback(self.settings.fallback_uom_code.as_str());
        let results = page
            .items
            .iter()
            .map(|row| to_result_item(row, &uoms))
            .collect();

        phase.advance();
        info!(
            total = page.total,
            raw_rows = raw_rows,
            page = page.page,
            total_pages = page.total_pages,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );

        let (columns, labels) = match config {
            Some(config) => (config.display_columns, config.column_labels),
            None => Default::default(),
        };

        Ok(SearchResponse {
            results,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
            columns,
            labels,
        })
    }

    /// Lists rows of any existing table using its resolved search config.
    ///
    /// A non-empty `query` is matched as one substring across the config's
    /// search columns. No token or quote handling applies here.
    pub async fn browse(&self, request: &BrowseRequest) -> SearchResult<BrowseResponse> {
        let span = info_span!("browse", request_id = %Uuid::new_v4(), table = %request.table);
        self.run_browse(request).instrument(span).await
    }

    async fn run_browse(&self, request: &BrowseRequest) -> SearchResult<BrowseResponse> {
        let table = request.table.trim();
        validate_identifier(table)?;

        let schema: Vec<ColumnInfo> = self
            .with_timeout(self.db.schema().table_columns(table))
            .await?
            .into_iter()
            .filter(|column| validate_identifier(&column.name).is_ok())
            .collect();
        if schema.is_empty() {
            warn!(table = %table, "Browse requested for unknown table");
            return Err(SearchError::unsupported_table(table));
        }

        let config = self
            .resolve_config(
                table,
                request.scope_type.as_deref(),
                request.scope_value.as_deref(),
                &schema,
            )
            .await
            .unwrap_or_else(|| config::schema_default(&schema));

        let limit = request
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.settings.browse_limit);
        let query = build_browse(
            table,
            &config.display_columns,
            &config.search_columns,
            &request.query,
            limit,
        )?;

        let rows = self.with_timeout(self.db.schema().browse(&query)).await?;
        info!(rows = rows.len(), "Browse complete");

        Ok(BrowseResponse {
            rows,
            columns: query.columns,
            labels: config.column_labels,
            search_columns: config.search_columns,
        })
    }

    /// Tables a `browse` request can name.
    pub async fn tables(&self) -> SearchResult<Vec<String>> {
        Ok(self.with_timeout(self.db.schema().list_tables()).await?)
    }

    /// Distinct vendors with active products.
    pub async fn vendors(&self) -> SearchResult<Vec<String>> {
        Ok(self.with_timeout(self.db.products().list_vendors()).await?)
    }

    /// Active row totals, overall and per vendor.
    pub async fn summary(&self) -> SearchResult<CatalogSummary> {
        let products = self.db.products();
        let (total, vendors) = self
            .with_timeout(async {
                let total = products.count_active().await?;
                let vendors = products.vendor_counts().await?;
                Ok::<_, DbError>((total, vendors))
            })
            .await?;
        Ok(CatalogSummary { total, vendors })
    }

    /// Dedup keys stored on more than one row.
    pub async fn duplicates(&self) -> SearchResult<Vec<DuplicateGroup>> {
        Ok(self.with_timeout(self.db.products().find_duplicates()).await?)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Resolves the stored config for a table and scope.
    ///
    /// Storage problems are logged and treated as "nothing stored".
    async fn resolve_config(
        &self,
        table: &str,
        scope_type: Option<&str>,
        scope_value: Option<&str>,
        schema: &[ColumnInfo],
    ) -> Option<SearchConfig> {
        let entries = match self.with_timeout(self.db.search_configs().entries_for(table)).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(table = %table, error = %err, "Search config unavailable, using defaults");
                Vec::new()
            }
        };

        let Some(resolved) = config::resolve(&entries, table, scope_type, scope_value, schema)
        else {
            warn!(table = %table, "No search config and no schema columns");
            return None;
        };
        debug!(table = %table, origin = resolved.origin(), "Resolved search config");

        let config = resolved.into_config();
        if schema.is_empty() {
            Some(config)
        } else {
            Some(config::reconcile_with_schema(config, schema))
        }
    }

    async fn schema_or_empty(&self, table: &str) -> Vec<ColumnInfo> {
        match self.with_timeout(self.db.schema().table_columns(table)).await {
            Ok(columns) => columns,
            Err(err) => {
                warn!(table = %table, error = %err, "Schema introspection failed");
                Vec::new()
            }
        }
    }

    /// Bounds one data-store call by the configured timeout (0 disables it).
    async fn with_timeout<T, F>(&self, call: F) -> DbResult<T>
    where
        F: Future<Output = DbResult<T>>,
    {
        let timeout_ms = self.settings.query_timeout_ms;
        if timeout_ms == 0 {
            return call.await;
        }
        match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout(timeout_ms)),
        }
    }
}

fn to_result_item(row: &ProductRow, uoms: &UomTable) -> ResultItem {
    ResultItem {
        item_code: row.item_code.clone(),
        description: row.description.clone(),
        price: row.price().map(|price| price.to_decimal_string()),
        unit: uoms.resolve(row.uom_id).to_string(),
        vendor: row.vendor.clone(),
        category: row.category.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
