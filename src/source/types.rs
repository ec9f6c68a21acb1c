//! Content source trait

use crate::error::Result;
use crate::types::{ContentNode, TermNode};
use async_trait::async_trait;

/// Where a build gets its content from.
///
/// Failures are `Error::SourceUnavailable` when the source could not be
/// reached and `Error::Source` when it answered with errors or malformed
/// data. Either one aborts the build.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &str;

    /// Fetch an ordered collection by key (`pages`, or a post type name)
    async fn fetch_collection(&self, key: &str) -> Result<Vec<ContentNode>>;

    /// Fetch the configured number of items per archive page
    async fn fetch_page_size(&self) -> Result<i64>;

    /// Fetch every term of a taxonomy with its linked content
    async fn fetch_terms(&self, taxonomy: &str) -> Result<Vec<TermNode>>;
}
