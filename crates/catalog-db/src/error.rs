//! # Database and Search Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        tokio::time::error::Elapsed         │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds categorization                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SearchError::DataStore ← What collaborators see                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { "error": "...", "code": "DATA_STORE" }                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error here is retried. A failed request returns no partial result.

use thiserror::Error;

use catalog_core::CoreError;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A referenced table does not exist.
    ///
    /// ## When This Occurs
    /// - Optional tables (`uom`, `search_config`) were never created
    /// - Browsing a table name that is not in the schema
    ///
    /// Callers treat this as non-fatal where the table is optional.
    #[error("Missing table: {0}")]
    MissingTable(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The data-store call exceeded the configured query timeout.
    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            DbError::MissingTable(_) => "MISSING_TABLE",
            DbError::ConnectionFailed(_) => "CONNECTION_FAILED",
            DbError::MigrationFailed(_) => "MIGRATION_FAILED",
            DbError::QueryFailed(_) => "QUERY_FAILED",
            DbError::PoolExhausted => "POOL_EXHAUSTED",
            DbError::Timeout(_) => "TIMEOUT",
            DbError::Internal(_) => "INTERNAL",
        }
    }

    pub fn is_missing_table(&self) -> bool {
        matches!(self, DbError::MissingTable(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database "no such table: X" → DbError::MissingTable(X)
/// sqlx::Error::Database (other)            → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut                → DbError::PoolExhausted
/// sqlx::Error::PoolClosed                  → DbError::ConnectionFailed
/// Other                                    → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite: "no such table: main.search_config"
                match msg.split("no such table: ").nth(1) {
                    Some(table) => DbError::MissingTable(table.trim().to_string()),
                    None => DbError::QueryFailed(msg.to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Search Errors
// =============================================================================

/// Errors returned by [`crate::SearchService`].
///
/// Paging and sort problems never appear here; they are corrected during
/// normalization.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request named a table the operation cannot serve.
    #[error("Unsupported table: {table}")]
    UnsupportedTable { table: String },

    /// The data store failed or timed out.
    #[error("Data store error: {0}")]
    DataStore(#[from] DbError),
}

impl SearchError {
    pub fn unsupported_table(table: impl Into<String>) -> Self {
        SearchError::UnsupportedTable {
            table: table.into(),
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            SearchError::UnsupportedTable { .. } => "UNSUPPORTED_TABLE",
            SearchError::DataStore(_) => "DATA_STORE",
        }
    }
}

impl From<CoreError> for SearchError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedTable { table } => SearchError::UnsupportedTable { table },
            CoreError::InvalidIdentifier { name } => SearchError::UnsupportedTable { table: name },
        }
    }
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(SearchError::unsupported_table("uom").code(), "UNSUPPORTED_TABLE");
        assert_eq!(SearchError::from(DbError::Timeout(50)).code(), "DATA_STORE");
        assert_eq!(DbError::Timeout(50).code(), "TIMEOUT");
        assert_eq!(DbError::MissingTable("uom".into()).code(), "MISSING_TABLE");
    }

    #[test]
    fn test_core_errors_map_to_unsupported_table() {
        let err: SearchError = CoreError::InvalidIdentifier {
            name: "x; DROP".into(),
        }
        .into();
        assert!(matches!(err, SearchError::UnsupportedTable { ref table } if table == "x; DROP"));
        assert_eq!(err.to_string(), "Unsupported table: x; DROP");
    }
}
