//! Snapshot content source
//!
//! Serves a previously captured CMS dump, for offline builds and tests.
//!
//! ```json
//! {
//!   "pageSize": 10,
//!   "collections": { "pages": [...], "post": [{"id": "p1", "uri": "/p1/"}] },
//!   "terms": { "category": [{"id": "t1", "name": "News", "uri": "/category/news/",
//!              "slug": "news", "termTaxonomyId": 4, "members": {"posts": [...]}}] }
//! }
//! ```

use super::types::ContentSource;
use crate::error::{Error, Result, ResultExt};
use crate::types::{ContentNode, TermNode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A captured CMS dump
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Items per archive page
    pub page_size: i64,
    /// Ordered collections by key
    #[serde(default)]
    pub collections: HashMap<String, Vec<ContentNode>>,
    /// Terms by taxonomy name
    #[serde(default)]
    pub terms: HashMap<String, Vec<TermNode>>,
}

/// Content source reading from a `Snapshot`
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    /// Serve an in-memory snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Read a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&json)
    }

    /// The underlying snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait]
impl ContentSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch_collection(&self, key: &str) -> Result<Vec<ContentNode>> {
        self.snapshot
            .collections
            .get(key)
            .cloned()
            .ok_or_else(|| Error::source_error(format!("snapshot has no collection '{key}'")))
    }

    async fn fetch_page_size(&self) -> Result<i64> {
        Ok(self.snapshot.page_size)
    }

    async fn fetch_terms(&self, taxonomy: &str) -> Result<Vec<TermNode>> {
        self.snapshot
            .terms
            .get(taxonomy)
            .cloned()
            .ok_or_else(|| Error::source_error(format!("snapshot has no taxonomy '{taxonomy}'")))
    }
}
