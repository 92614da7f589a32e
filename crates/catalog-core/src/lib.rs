//! # catalog-core: Pure Search Logic for the Catalog Backend
//!
//! This crate is the **heart** of product search. It turns a free-text
//! query into parameterized SQL, merges duplicate catalog rows, and slices
//! the result into pages. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Search Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Collaborators (HTTP handler, CLI)                  │   │
//! │  │           SearchRequest ──►        ◄── SearchResponse           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              catalog-db: SearchService facade                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌────────────┐  ┌──────────────┐   │   │
//! │  │   │  query  │  │  dedup  │  │ pagination │  │    config    │   │   │
//! │  │   │ builder │  │  merge  │  │  slicing   │  │  precedence  │   │   │
//! │  │   └─────────┘  └─────────┘  └────────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product rows, requests, result pages
//! - [`money`] - Integer-cent price type
//! - [`query`] - SQL predicate compilation
//! - [`dedup`] - Duplicate row reconciliation
//! - [`pagination`] - Page slicing
//! - [`config`] - Stored search config precedence
//! - [`uom`] - Unit of measure lookup
//! - [`validation`] - Request normalization (never rejects)
//! - [`phase`] - Search request state machine
//! - [`settings`] - Tunables injected at process start
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::query::QueryBuilder;
//! use catalog_core::types::{SortField, SortOrder};
//!
//! let compiled = QueryBuilder::new()
//!     .build("angus beef", None, SortField::Price, SortOrder::Desc);
//!
//! // Two tokens, three columns each
//! assert_eq!(compiled.params.len(), 6);
//! assert_eq!(compiled.order_clause, "p.price_cents DESC, p.id ASC");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod dedup;
pub mod error;
pub mod money;
pub mod pagination;
pub mod phase;
pub mod query;
pub mod settings;
pub mod types;
pub mod uom;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{ConfigScope, ResolvedConfig, SearchConfig, SearchConfigEntry};
pub use dedup::{dedupe, FieldMerge, MergePolicy};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use pagination::{paginate, Page};
pub use phase::SearchPhase;
pub use query::{CompiledQuery, QueryBuilder, SearchQuery, SqlParam};
pub use settings::SearchSettings;
pub use types::*;
pub use uom::UomTable;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The only table the text-search path understands.
pub const CATALOG_TABLE: &str = "products";

/// Rows per page when the request does not say otherwise.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on rows fetched before deduplication.
///
/// Heavy import duplication means the raw row count can be several times
/// the visible count, so the cap is well above any sensible page size.
pub const DEFAULT_FETCH_LIMIT: u32 = 10_000;

/// Unit code shown when a row has no resolvable unit of measure.
pub const FALLBACK_UOM_CODE: &str = "EA";

/// Row cap for generic table browsing.
pub const DEFAULT_BROWSE_LIMIT: u32 = 100;
