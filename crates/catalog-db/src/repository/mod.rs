//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SearchService                                                         │
//! │       │                                                                 │
//! │       │  db.products().fetch_matching(&compiled, 10_000)               │
//! │       ▼                                                                 │
//! │  ProductRepository ─────┐                                              │
//! │  UomRepository          │  SQL (positional binds only)                 │
//! │  SearchConfigRepository │                                              │
//! │  SchemaRepository ──────┘                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Search SQL is assembled by `catalog-core` at runtime, so these
//! repositories use the unchecked `sqlx::query*` functions and bind
//! [`SqlParam`] lists in order.

pub mod product;
pub mod schema;
pub mod search_config;
pub mod uom;

use catalog_core::SqlParam;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// Binds `params` to a typed query, in placeholder order.
pub(crate) fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Text(text) => query.bind(text.as_str()),
            SqlParam::Integer(value) => query.bind(*value),
        };
    }
    query
}

/// Binds `params` to an untyped query, in placeholder order.
pub(crate) fn bind_query<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlParam],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Text(text) => query.bind(text.as_str()),
            SqlParam::Integer(value) => query.bind(*value),
        };
    }
    query
}
