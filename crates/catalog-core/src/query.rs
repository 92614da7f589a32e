//! # Query Builder
//!
//! Compiles a raw search string plus filters into a parameterized SQL
//! predicate, a parameter list and an ORDER BY clause.
//!
//! ## Compilation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Raw Query → Predicate                                │
//! │                                                                         │
//! │  ""  or  "*"           → p.is_active = 1                               │
//! │                                                                         │
//! │  pie                   → (item_code LIKE %pie% OR description LIKE ..  │
//! │                           OR category LIKE ..)                          │
//! │                                                                         │
//! │  angus beef            → (.. %angus% ..) AND (.. %beef% ..)            │
//! │                           every token must hit SOME column              │
//! │                                                                         │
//! │  "pie"   (quoted)      → (LOWER(item_code) REGEXP <word pie> OR ..)    │
//! │                           "apple pie" ✓   "apple pieces" ✗             │
//! │                                                                         │
//! │  + vendor filter       → AND p.vendor = ?                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Injection Safety
//! Only column identifiers and operators are chosen structurally. Every
//! user-supplied value travels as a positional `?` parameter, in order.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{SortField, SortOrder};
use crate::FALLBACK_UOM_CODE;

/// Columns every token is matched against.
const TEXT_COLUMNS: [&str; 3] = ["p.item_code", "p.description", "p.category"];

// =============================================================================
// Parameters
// =============================================================================

/// A value bound to a positional `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

impl SqlParam {
    /// Returns the text value, if this is a text parameter.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlParam::Text(value) => Some(value),
            SqlParam::Integer(_) => None,
        }
    }
}

// =============================================================================
// Search Query
// =============================================================================

/// A parsed search string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// The string as received.
    pub raw: String,
    /// Whitespace-separated tokens, quotes stripped. Empty = match all.
    pub tokens: Vec<String>,
    /// The whole query was wrapped in matching `"` or `'` quotes.
    pub quoted: bool,
}

impl SearchQuery {
    /// Parses a raw query string.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::query::SearchQuery;
    ///
    /// let q = SearchQuery::parse("'apple pie'");
    /// assert!(q.quoted);
    /// assert_eq!(q.tokens, vec!["apple", "pie"]);
    ///
    /// assert!(SearchQuery::parse("*").is_match_all());
    /// assert!(SearchQuery::parse("   ").is_match_all());
    /// ```
    pub fn parse(raw: &str) -> SearchQuery {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return SearchQuery {
                raw: raw.to_string(),
                tokens: Vec::new(),
                quoted: false,
            };
        }

        let (body, quoted) = match strip_matching_quotes(trimmed) {
            Some(inner) => (inner, true),
            None => (trimmed, false),
        };

        SearchQuery {
            raw: raw.to_string(),
            tokens: body.split_whitespace().map(str::to_string).collect(),
            quoted,
        }
    }

    /// True when no text predicate should be applied.
    #[inline]
    pub fn is_match_all(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn strip_matching_quotes(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    if value.len() < 2 || !(first == '"' || first == '\'') || !value.ends_with(first) {
        return None;
    }
    Some(&value[1..value.len() - 1])
}

// =============================================================================
// Compiled Query
// =============================================================================

/// Output of [`QueryBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// WHERE-clause body (without the `WHERE` keyword).
    pub predicate: String,
    /// Values for the `?` placeholders in `predicate`, in order.
    pub params: Vec<SqlParam>,
    /// ORDER BY body (without the keywords).
    pub order_clause: String,
    /// Values for the `?` placeholders in `order_clause`, bound after `params`.
    pub order_params: Vec<SqlParam>,
    /// The order clause references the joined `uom` table as `u`.
    pub joins_uom: bool,
    /// The parsed query the predicate was built from.
    pub search: SearchQuery,
}

/// Builds catalog search predicates.
///
/// ## Usage
/// ```rust
/// use catalog_core::query::{QueryBuilder, SqlParam};
/// use catalog_core::types::{SortField, SortOrder};
///
/// let compiled = QueryBuilder::new()
///     .build("pie", Some("Sysco"), SortField::Description, SortOrder::Asc);
///
/// assert!(compiled.predicate.starts_with("p.is_active = 1 AND ("));
/// assert!(compiled.predicate.ends_with("AND p.vendor = ?"));
/// assert_eq!(compiled.params.last(), Some(&SqlParam::Text("Sysco".into())));
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    fallback_unit: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder {
            fallback_unit: FALLBACK_UOM_CODE.to_string(),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    /// Unit code that rows without a known unit sort under.
    ///
    /// Must match the code those rows are displayed with, so a unit sort
    /// orders rows the way they read. A blank value keeps the current one.
    pub fn with_fallback_unit(mut self, code: &str) -> Self {
        if !code.trim().is_empty() {
            self.fallback_unit = code.to_string();
        }
        self
    }

    /// Compiles `query` and filters into predicate, params and order clause.
    pub fn build(
        &self,
        query: &str,
        vendor: Option<&str>,
        sort_field: SortField,
        sort_order: SortOrder,
    ) -> CompiledQuery {
        let search = SearchQuery::parse(query);

        let mut conditions = vec!["p.is_active = 1".to_string()];
        let mut params = Vec::new();

        // One OR-group per token, ANDed together
        for token in &search.tokens {
            let (group, value) = if search.quoted {
                (exact_word_group(), exact_word_pattern(token))
            } else {
                (substring_group(), like_pattern(token))
            };
            conditions.push(group);
            params.extend(TEXT_COLUMNS.iter().map(|_| SqlParam::Text(value.clone())));
        }

        if let Some(vendor) = vendor.filter(|v| !v.is_empty()) {
            conditions.push("p.vendor = ?".to_string());
            params.push(SqlParam::Text(vendor.to_string()));
        }

        // Unknown and missing units sort under the code they display as
        let (sort_key, order_params) = if sort_field == SortField::Unit {
            (
                format!("COALESCE(NULLIF({}, ''), ?)", sort_field.column()),
                vec![SqlParam::Text(self.fallback_unit.clone())],
            )
        } else {
            (sort_field.column().to_string(), Vec::new())
        };

        CompiledQuery {
            predicate: conditions.join(" AND "),
            params,
            order_clause: format!("{} {}, p.id ASC", sort_key, sort_order.as_sql()),
            order_params,
            joins_uom: sort_field == SortField::Unit,
            search,
        }
    }
}

impl CompiledQuery {
    /// The same query without the `uom` join.
    ///
    /// With no unit table every row resolves to the fallback code, so a
    /// unit sort collapses to the `p.id` tie-breaker.
    pub fn without_uom_join(&self) -> CompiledQuery {
        if !self.joins_uom {
            return self.clone();
        }
        CompiledQuery {
            order_clause: "p.id ASC".to_string(),
            order_params: Vec::new(),
            joins_uom: false,
            ..self.clone()
        }
    }

    /// Predicate values followed by order-clause values.
    pub fn bind_params(&self) -> Vec<SqlParam> {
        self.params
            .iter()
            .chain(self.order_params.iter())
            .cloned()
            .collect()
    }
}

fn substring_group() -> String {
    let parts: Vec<String> = TEXT_COLUMNS
        .iter()
        .map(|col| format!("{} LIKE ? ESCAPE '\\'", col))
        .collect();
    format!("({})", parts.join(" OR "))
}

fn exact_word_group() -> String {
    // COALESCE keeps NULL categories out of the REGEXP function
    let parts: Vec<String> = TEXT_COLUMNS
        .iter()
        .map(|col| format!("LOWER(COALESCE({}, '')) REGEXP ?", col))
        .collect();
    format!("({})", parts.join(" OR "))
}

/// `%token%` with LIKE wildcards in the token escaped.
fn like_pattern(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len() + 2);
    escaped.push('%');
    for c in token.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Case-insensitive whole-word pattern for `token`.
///
/// Boundaries are "start/end of text or a non-word character", so tokens
/// that begin or end with punctuation still anchor sensibly.
pub fn exact_word_pattern(token: &str) -> String {
    format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(&token.to_lowercase()))
}

// =============================================================================
// Generic Browse Query
// =============================================================================

/// A fully assembled SELECT for generic table browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
    pub columns: Vec<String>,
}

/// Builds a column-list SELECT over `table`.
///
/// Every column is cast to TEXT so rows of any shape decode uniformly.
/// A non-empty `query` is matched as one substring across `search_columns`.
pub fn build_browse(
    table: &str,
    display_columns: &[String],
    search_columns: &[String],
    query: &str,
    limit: u32,
) -> CoreResult<BrowseQuery> {
    validate_identifier(table)?;
    if display_columns.is_empty() {
        return Err(CoreError::unsupported_table(table));
    }

    let mut select = Vec::with_capacity(display_columns.len());
    for column in display_columns {
        validate_identifier(column)?;
        select.push(format!("CAST(\"{0}\" AS TEXT) AS \"{0}\"", column));
    }

    let mut sql = format!("SELECT {} FROM \"{}\"", select.join(", "), table);
    let mut params = Vec::new();

    let query = query.trim();
    if !query.is_empty() && !search_columns.is_empty() {
        let mut clauses = Vec::with_capacity(search_columns.len());
        for column in search_columns {
            validate_identifier(column)?;
            clauses.push(format!("\"{}\" LIKE ? ESCAPE '\\'", column));
            params.push(SqlParam::Text(like_pattern(query)));
        }
        sql.push_str(&format!(" WHERE {}", clauses.join(" OR ")));
    }

    sql.push_str(" LIMIT ?");
    params.push(SqlParam::Integer(i64::from(limit)));

    Ok(BrowseQuery {
        sql,
        params,
        columns: display_columns.to_vec(),
    })
}

/// Refuses anything that is not a plain SQL identifier.
pub fn validate_identifier(name: &str) -> CoreResult<()> {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let re = IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    });

    if re.is_match(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
