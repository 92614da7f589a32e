//! # catalog-db: Database Layer and Search Facade
//!
//! SQLite storage for the product catalog, plus the [`SearchService`] that
//! ties `catalog-core`'s pure search logic to real rows.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Collaborator (CLI, HTTP handler)                                      │
//! │       │  SearchRequest                                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SearchService │───►│  Repositories │    │  Migrations  │  │   │
//! │  │   │ (service.rs)  │    │ product, uom, │    │  (embedded)  │  │   │
//! │  │   │               │    │ search_config,│    │              │  │   │
//! │  │   │ phase machine │    │ schema        │    │ 001, 002     │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                        Database (pool.rs)                       │   │
//! │  └────────────────────────────────┬────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                            SQLite Database                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and search error types
//! - [`repository`] - Repository implementations
//! - [`service`] - The search façade
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_core::{SearchRequest, SearchSettings};
//! use catalog_db::{Database, DbConfig, SearchService};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//! let settings = SearchSettings::default();
//!
//! let response = SearchService::new(&db, &settings)
//!     .search(&SearchRequest::new("\"pie\""))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, SearchError, SearchResult};
pub use pool::{Database, DbConfig};
pub use service::SearchService;

// Repository re-exports for convenience
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::schema::SchemaRepository;
pub use repository::search_config::SearchConfigRepository;
pub use repository::uom::UomRepository;
