//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  └── CoreError        - Domain rule violations                         │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── SearchError      - What the facade returns to collaborators       │
//! │                                                                         │
//! │  Flow: CoreError → SearchError ← DbError → { "error": "..." }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error Here
//! - Bad page/sort/order inputs are corrected by [`crate::validation`].
//! - Missing search config falls back to schema defaults in [`crate::config`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core search errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The text-search path only serves the catalog table.
    ///
    /// ## When This Occurs
    /// - A search request names any table other than `products`
    /// - A browse request names a table that does not exist
    #[error("Unsupported table: {table}")]
    UnsupportedTable { table: String },

    /// A table or column name is not a plain SQL identifier.
    ///
    /// Identifiers are spliced into SQL text (values never are), so anything
    /// outside `[A-Za-z_][A-Za-z0-9_]*` is refused.
    #[error("Invalid identifier: '{name}'")]
    InvalidIdentifier { name: String },
}

impl CoreError {
    /// Creates an UnsupportedTable error.
    pub fn unsupported_table(table: impl Into<String>) -> Self {
        CoreError::UnsupportedTable {
            table: table.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::unsupported_table("orders");
        assert_eq!(err.to_string(), "Unsupported table: orders");

        let err = CoreError::InvalidIdentifier {
            name: "name; DROP".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid identifier: 'name; DROP'");
    }
}
