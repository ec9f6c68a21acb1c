//! Query catalog
//!
//! Every collection the site needs is registered here with the exact
//! GraphQL field it is read from. Query documents are generated from these
//! entries; names are never derived by transforming strings.

use crate::error::{Error, Result};
use std::fmt::Write as _;

/// Reads the CMS "posts per page" reading setting.
pub const PAGE_SIZE_QUERY: &str =
    "query ReadingSettings { wp { readingSettings { postsPerPage } } }";

/// How to fetch one ordered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    /// Collection key (`pages`, `post`, `emploi`, ...)
    pub key: String,
    /// GraphQL operation name
    pub operation: String,
    /// Root field holding the `nodes` list (e.g. `allWpPost`)
    pub field: String,
    /// Raw argument list placed in the field's parentheses
    pub arguments: Option<String>,
}

impl CollectionQuery {
    /// Create a new collection query
    pub fn new(
        key: impl Into<String>,
        operation: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            operation: operation.into(),
            field: field.into(),
            arguments: None,
        }
    }

    /// Set the field arguments (e.g. `sort: { date: DESC }`)
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    /// The GraphQL document for this collection
    pub fn document(&self) -> String {
        format!(
            "query {} {{ {}{} {{ nodes {{ id uri }} }} }}",
            self.operation,
            self.field,
            render_arguments(self.arguments.as_deref())
        )
    }
}

/// How to fetch the terms of one taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsQuery {
    /// Taxonomy name (`category`, `competence`, ...)
    pub taxonomy: String,
    /// GraphQL operation name
    pub operation: String,
    /// Root field holding the term `nodes` list (e.g. `allWpCategory`)
    pub field: String,
    /// Connection fields linking each term to content (e.g. `posts`)
    pub connections: Vec<String>,
}

impl TermsQuery {
    /// Create a new terms query
    pub fn new(
        taxonomy: impl Into<String>,
        operation: impl Into<String>,
        field: impl Into<String>,
        connections: Vec<String>,
    ) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            operation: operation.into(),
            field: field.into(),
            connections,
        }
    }

    /// The GraphQL document for this taxonomy
    pub fn document(&self) -> String {
        let mut selection = String::from("id name uri slug termTaxonomyId");
        for connection in &self.connections {
            let _ = write!(selection, " {connection} {{ nodes {{ id uri }} }}");
        }
        format!(
            "query {} {{ {} {{ nodes {{ {selection} }} }} }}",
            self.operation, self.field
        )
    }
}

fn render_arguments(arguments: Option<&str>) -> String {
    match arguments.map(str::trim) {
        Some(args) if !args.is_empty() => format!("({args})"),
        _ => String::new(),
    }
}

/// The set of queries a site build issues
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCatalog {
    collections: Vec<CollectionQuery>,
    taxonomies: Vec<TermsQuery>,
}

impl QueryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, failing on a duplicate key
    pub fn add_collection(&mut self, query: CollectionQuery) -> Result<()> {
        if self.collections.iter().any(|q| q.key == query.key) {
            return Err(Error::config(format!(
                "collection '{}' is registered twice",
                query.key
            )));
        }
        self.collections.push(query);
        Ok(())
    }

    /// Register a taxonomy, failing on a duplicate name
    pub fn add_taxonomy(&mut self, query: TermsQuery) -> Result<()> {
        if self.taxonomies.iter().any(|q| q.taxonomy == query.taxonomy) {
            return Err(Error::config(format!(
                "taxonomy '{}' is registered twice",
                query.taxonomy
            )));
        }
        self.taxonomies.push(query);
        Ok(())
    }

    /// Look up a collection by key
    pub fn collection(&self, key: &str) -> Result<&CollectionQuery> {
        self.collections
            .iter()
            .find(|q| q.key == key)
            .ok_or_else(|| Error::config(format!("no query registered for collection '{key}'")))
    }

    /// Look up a taxonomy by name
    pub fn taxonomy(&self, taxonomy: &str) -> Result<&TermsQuery> {
        self.taxonomies
            .iter()
            .find(|q| q.taxonomy == taxonomy)
            .ok_or_else(|| Error::config(format!("no query registered for taxonomy '{taxonomy}'")))
    }

    /// Registered collections, in registration order
    pub fn collections(&self) -> &[CollectionQuery] {
        &self.collections
    }

    /// Registered taxonomies, in registration order
    pub fn taxonomies(&self) -> &[TermsQuery] {
        &self.taxonomies
    }

    /// Every document the catalog can issue, labelled, page size first
    pub fn documents(&self) -> Vec<(String, String)> {
        let mut docs = vec![("page_size".to_string(), PAGE_SIZE_QUERY.to_string())];
        docs.extend(
            self.collections
                .iter()
                .map(|q| (format!("collection:{}", q.key), q.document())),
        );
        docs.extend(
            self.taxonomies
                .iter()
                .map(|q| (format!("taxonomy:{}", q.taxonomy), q.document())),
        );
        docs
    }
}
