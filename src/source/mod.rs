//! Content source module
//!
//! Fetches the collections a site is built from.
//!
//! # Overview
//!
//! The source module provides:
//! - `ContentSource` - The fetch interface the engine builds against
//! - `GraphqlSource` - Queries a WordPress GraphQL endpoint over HTTP
//! - `SnapshotSource` - Serves the same data from a JSON document
//! - `QueryCatalog` - Maps collection keys to GraphQL query and field names
//!
//! # Example
//!
//! ```rust,ignore
//! use pressplan::source::{ContentSource, SnapshotSource};
//!
//! let source = SnapshotSource::from_path("snapshot.json")?;
//! let posts = source.fetch_collection("post").await?;
//! let page_size = source.fetch_page_size().await?;
//! ```

mod catalog;
mod graphql;
mod snapshot;
mod types;

pub use catalog::{CollectionQuery, QueryCatalog, TermsQuery, PAGE_SIZE_QUERY};
pub use graphql::GraphqlSource;
pub use snapshot::{Snapshot, SnapshotSource};
pub use types::ContentSource;

#[cfg(test)]
mod tests;
