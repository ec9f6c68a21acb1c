//! Common types used throughout pressplan
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Metadata threaded through page plans into the page context.
///
/// Insertion order is preserved so emitted contexts read the same on every run.
pub type Metadata = JsonObject;

// ============================================================================
// Content Types
// ============================================================================

/// A single piece of CMS content as far as page planning cares: an opaque
/// identity and the URI the CMS assigns to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Opaque CMS node id
    pub id: String,
    /// URI assigned by the CMS (e.g. `/2024/05/hello-world/`)
    #[serde(default)]
    pub uri: String,
}

impl ContentNode {
    /// Create a new content node
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
        }
    }
}

/// A taxonomy term together with the content linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermNode {
    /// Opaque CMS node id
    pub id: String,
    /// Display name
    pub name: String,
    /// URI of the term's listing page (usually ends with `/`)
    pub uri: String,
    /// URL slug
    pub slug: String,
    /// Numeric term taxonomy id
    pub term_taxonomy_id: i64,
    /// Linked content per connection name (e.g. `posts`, `emplois`),
    /// in CMS order
    #[serde(default)]
    pub members: HashMap<String, Vec<ContentNode>>,
}

impl TermNode {
    /// Linked content for a connection, empty when the term has none
    pub fn members_of(&self, connection: &str) -> &[ContentNode] {
        self.members.get(connection).map_or(&[], Vec::as_slice)
    }
}

// ============================================================================
// Retry Backoff
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_term_node_deserialize() {
        let term: TermNode = serde_json::from_value(json!({
            "id": "dGVybTo0",
            "name": "News",
            "uri": "/category/news/",
            "slug": "news",
            "termTaxonomyId": 4,
            "members": {"posts": [{"id": "p1", "uri": "/p1/"}]}
        }))
        .unwrap();

        assert_eq!(term.term_taxonomy_id, 4);
        assert_eq!(term.members_of("posts").len(), 1);
        assert!(term.members_of("emplois").is_empty());
    }

    #[test]
    fn test_backoff_type_serde() {
        let b: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(b, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
