//! GraphQL content source
//!
//! Issues the catalog's documents against a WordPress GraphQL endpoint.

use super::catalog::{QueryCatalog, TermsQuery, PAGE_SIZE_QUERY};
use super::types::ContentSource;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{ContentNode, JsonObject, JsonValue, TermNode};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Content source backed by a GraphQL endpoint
#[derive(Debug)]
pub struct GraphqlSource {
    client: HttpClient,
    endpoint: String,
    catalog: Arc<QueryCatalog>,
}

impl GraphqlSource {
    /// Create a new source. `endpoint` must be an absolute http(s) URL.
    pub fn new(
        client: HttpClient,
        endpoint: impl Into<String>,
        catalog: Arc<QueryCatalog>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let parsed = url::Url::parse(&endpoint)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "GraphQL endpoint must be http(s), got '{endpoint}'"
            )));
        }

        Ok(Self {
            client,
            endpoint,
            catalog,
        })
    }

    /// The endpoint queries are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a document and return its `data` object.
    ///
    /// Transport failures are reclassified as source errors; a non-empty
    /// `errors` array fails the query even when partial data came back.
    async fn execute(&self, document: &str) -> Result<JsonValue> {
        let response: JsonValue = self
            .client
            .post_json(&self.endpoint, json!({ "query": document }))
            .await
            .map_err(Error::into_source_error)?;

        if let Some(errors) = response.get("errors").and_then(JsonValue::as_array) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .map(|e| e.get("message").and_then(JsonValue::as_str).unwrap_or("unknown error"))
                    .collect();
                return Err(Error::source_error(format!(
                    "GraphQL errors: {}",
                    messages.join("; ")
                )));
            }
        }

        match response.get("data") {
            Some(data) if data.is_object() => Ok(data.clone()),
            _ => Err(Error::source_error("GraphQL response has no data")),
        }
    }
}

#[async_trait]
impl ContentSource for GraphqlSource {
    fn name(&self) -> &str {
        "graphql"
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_collection(&self, key: &str) -> Result<Vec<ContentNode>> {
        let query = self.catalog.collection(key)?;
        let data = self.execute(&query.document()).await?;
        let nodes = nodes_of(&data, &query.field)?;

        let items: Vec<ContentNode> = serde_json::from_value(JsonValue::Array(nodes.to_vec()))
            .map_err(|e| Error::source_error(format!("malformed '{}' nodes: {e}", query.field)))?;
        debug!("Fetched {} items for collection '{}'", items.len(), key);
        Ok(items)
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_page_size(&self) -> Result<i64> {
        let data = self.execute(PAGE_SIZE_QUERY).await?;
        data.pointer("/wp/readingSettings/postsPerPage")
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| Error::source_error("response has no wp.readingSettings.postsPerPage"))
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_terms(&self, taxonomy: &str) -> Result<Vec<TermNode>> {
        let query = self.catalog.taxonomy(taxonomy)?;
        let data = self.execute(&query.document()).await?;
        let terms = nodes_of(&data, &query.field)?
            .iter()
            .map(|node| parse_term(node, query))
            .collect::<Result<Vec<_>>>()?;
        debug!("Fetched {} terms for taxonomy '{}'", terms.len(), taxonomy);
        Ok(terms)
    }
}

/// `data.{field}.nodes`
fn nodes_of<'a>(data: &'a JsonValue, field: &str) -> Result<&'a [JsonValue]> {
    data.get(field)
        .and_then(|f| f.get("nodes"))
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::source_error(format!("response has no '{field}.nodes' list")))
}

fn parse_term(node: &JsonValue, query: &TermsQuery) -> Result<TermNode> {
    let object = node
        .as_object()
        .ok_or_else(|| Error::source_error(format!("'{}' node is not an object", query.field)))?;

    let mut members = HashMap::with_capacity(query.connections.len());
    for connection in &query.connections {
        let linked = match object.get(connection) {
            None => {
                return Err(Error::source_error(format!(
                    "term in '{}' is missing connection '{connection}'",
                    query.field
                )))
            }
            Some(JsonValue::Null) => Vec::new(),
            Some(value) => {
                let nodes = nodes_of_connection(value, connection)?;
                serde_json::from_value(JsonValue::Array(nodes.to_vec())).map_err(|e| {
                    Error::source_error(format!("malformed '{connection}' nodes: {e}"))
                })?
            }
        };
        members.insert(connection.clone(), linked);
    }

    Ok(TermNode {
        id: required_str(object, "id")?,
        name: required_str(object, "name")?,
        uri: required_str(object, "uri")?,
        slug: required_str(object, "slug")?,
        term_taxonomy_id: object
            .get("termTaxonomyId")
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| Error::source_error("term has no numeric 'termTaxonomyId'"))?,
        members,
    })
}

fn nodes_of_connection<'a>(value: &'a JsonValue, connection: &str) -> Result<&'a [JsonValue]> {
    value
        .get("nodes")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::source_error(format!("connection '{connection}' has no nodes list")))
}

fn required_str(object: &JsonObject, key: &str) -> Result<String> {
    object
        .get(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::source_error(format!("term has no string '{key}'")))
}
