//! Subcommands and their mapping onto [`SearchService`] calls.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use catalog_core::{BrowseRequest, SearchRequest};
use catalog_db::{SearchError, SearchResult, SearchService};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Text search over the product catalog
    Search(SearchArgs),

    /// List rows of any table using its stored search config
    Browse(BrowseArgs),

    /// Tables that can be browsed
    Tables,

    /// Vendors with active products
    Vendors,

    /// Active product counts, overall and per vendor
    Summary,

    /// (item_code, vendor) pairs stored on more than one row
    Duplicates,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free text; wrap in quotes for exact-word matching, `*` for everything
    #[arg(default_value = "")]
    pub query: String,

    #[arg(long)]
    pub vendor: Option<String>,

    /// item_code, description, price, vendor, category or unit
    #[arg(long)]
    pub sort_field: Option<String>,

    /// ASC or DESC
    #[arg(long)]
    pub sort_order: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub per_page: Option<i64>,

    #[arg(long)]
    pub table: Option<String>,

    #[arg(long)]
    pub scope_type: Option<String>,

    #[arg(long)]
    pub scope_value: Option<String>,
}

impl From<SearchArgs> for SearchRequest {
    fn from(args: SearchArgs) -> Self {
        SearchRequest {
            query: args.query,
            vendor: args.vendor,
            sort_field: args.sort_field,
            sort_order: args.sort_order,
            page: args.page,
            per_page: args.per_page,
            table: args.table,
            scope_type: args.scope_type,
            scope_value: args.scope_value,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct BrowseArgs {
    pub table: String,

    /// Substring matched against the table's search columns
    #[arg(default_value = "")]
    pub query: String,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub scope_type: Option<String>,

    #[arg(long)]
    pub scope_value: Option<String>,
}

impl From<BrowseArgs> for BrowseRequest {
    fn from(args: BrowseArgs) -> Self {
        BrowseRequest {
            table: args.table,
            query: args.query,
            scope_type: args.scope_type,
            scope_value: args.scope_value,
            limit: args.limit,
        }
    }
}

impl Command {
    /// Runs the command and returns its JSON output.
    pub async fn run(self, service: &SearchService<'_>) -> SearchResult<Value> {
        match self {
            Command::Search(args) => to_json(service.search(&args.into()).await?),
            Command::Browse(args) => to_json(service.browse(&args.into()).await?),
            Command::Tables => to_json(service.tables().await?),
            Command::Vendors => to_json(service.vendors().await?),
            Command::Summary => to_json(service.summary().await?),
            Command::Duplicates => to_json(service.duplicates().await?),
        }
    }
}

fn to_json<T: Serialize>(value: T) -> SearchResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        SearchError::DataStore(catalog_db::DbError::Internal(format!(
            "Failed to encode response: {}",
            e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        TestCli::try_parse_from(std::iter::once("catalog").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_search_args_map_to_request() {
        let Command::Search(args) = parse(&[
            "search",
            "angus beef",
            "--vendor",
            "Sysco",
            "--sort-field",
            "price",
            "--page",
            "-2",
            "--per-page",
            "25",
        ]) else {
            panic!("expected search");
        };

        let request = SearchRequest::from(args);
        assert_eq!(request.query, "angus beef");
        assert_eq!(request.vendor.as_deref(), Some("Sysco"));
        assert_eq!(request.sort_field.as_deref(), Some("price"));
        assert_eq!(request.page, Some(-2));
        assert_eq!(request.per_page, Some(25));
        assert_eq!(request.table, None);
    }

    #[test]
    fn test_search_query_defaults_to_empty() {
        let Command::Search(args) = parse(&["search"]) else {
            panic!("expected search");
        };
        assert_eq!(args.query, "");
    }

    #[test]
    fn test_browse_args() {
        let Command::Browse(args) = parse(&["browse", "uom", "cs", "--limit", "5"]) else {
            panic!("expected browse");
        };
        let request = BrowseRequest::from(args);
        assert_eq!(request.table, "uom");
        assert_eq!(request.query, "cs");
        assert_eq!(request.limit, Some(5));
    }

    #[test]
    fn test_unit_subcommands() {
        assert!(matches!(parse(&["tables"]), Command::Tables));
        assert!(matches!(parse(&["vendors"]), Command::Vendors));
        assert!(matches!(parse(&["summary"]), Command::Summary));
        assert!(matches!(parse(&["duplicates"]), Command::Duplicates));
    }
}
