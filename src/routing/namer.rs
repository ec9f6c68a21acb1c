//! Route namer
//!
//! Pure path construction for archive pages.

use super::types::{RouteKind, SeparatorPolicy};

/// Path segment used by the root collection for pages after the first
pub const ROOT_ARCHIVE_PREFIX: &str = "blog";

/// Canonical path of page `page_number` out of `total_pages`.
///
/// Returns `None` when `page_number` is outside `1..=total_pages`; the plan
/// builder relies on this to leave the first page's previous link and the
/// last page's next link empty.
pub fn path(kind: &RouteKind, page_number: usize, total_pages: usize) -> Option<String> {
    if page_number < 1 || page_number > total_pages {
        return None;
    }

    let first = page_number == 1;
    let path = match kind {
        RouteKind::Root if first => "/".to_string(),
        RouteKind::Root => format!("/{ROOT_ARCHIVE_PREFIX}/{page_number}"),
        RouteKind::Namespaced(name) if first => format!("/{name}"),
        RouteKind::Namespaced(name) => format!("/{name}/{page_number}"),
        RouteKind::Term { uri, .. } if first => uri.clone(),
        RouteKind::Term { uri, separator } => match separator {
            SeparatorPolicy::EnsureSlash if !uri.ends_with('/') => format!("{uri}/{page_number}"),
            _ => format!("{uri}{page_number}"),
        },
    };

    Some(path)
}
