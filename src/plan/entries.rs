//! Entry pages
//!
//! One page per CMS page and one page per post.

use super::types::PageRecord;
use crate::types::{ContentNode, JsonValue, Metadata};

/// One record per CMS page: `path = uri`, context `{id}`.
pub fn page_records(pages: &[ContentNode], component: &str) -> Vec<PageRecord> {
    pages
        .iter()
        .map(|page| {
            let mut context = Metadata::new();
            context.insert("id".to_string(), page.id.clone().into());
            PageRecord::new(&page.uri, component, context)
        })
        .collect()
}

/// One record per post of `post_type`, linked to its neighbours.
///
/// `posts` must be the complete ordered collection from a single fetch; the
/// previous/next ids are its adjacent items.
pub fn entry_records(posts: &[ContentNode], post_type: &str, component: &str) -> Vec<PageRecord> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let previous = i.checked_sub(1).and_then(|p| posts.get(p));
            let next = posts.get(i + 1);

            let mut context = Metadata::new();
            context.insert("id".to_string(), post.id.clone().into());
            context.insert("postType".to_string(), post_type.into());
            context.insert("previousPostId".to_string(), id_or_null(previous));
            context.insert("nextPostId".to_string(), id_or_null(next));
            PageRecord::new(&post.uri, component, context)
        })
        .collect()
}

fn id_or_null(node: Option<&ContentNode>) -> JsonValue {
    node.map_or(JsonValue::Null, |n| JsonValue::String(n.id.clone()))
}
