//! Page plan builder
//!
//! Combines the paginator and the route namer.

use super::types::PagePlan;
use crate::error::{Error, Result};
use crate::pagination::paginate;
use crate::routing::{self, RouteKind};
use crate::types::Metadata;

/// Build the archive pages of one collection.
///
/// Returns plans in ascending page order; an empty collection yields none.
/// Fails with `InvalidArgument` when `page_size <= 0`.
pub fn build<T>(
    items: &[T],
    page_size: i64,
    kind: &RouteKind,
    base_metadata: &Metadata,
) -> Result<Vec<PagePlan>> {
    let groups = paginate(items, page_size)?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let total_pages = groups.len();
    // paginate already rejected non-positive sizes
    let page_size = page_size as usize;

    groups
        .iter()
        .map(|group| {
            let page_number = group.number;
            let path = routing::path(kind, page_number, total_pages).ok_or_else(|| {
                Error::internal(format!(
                    "no path for page {page_number} of {total_pages} ({kind})"
                ))
            })?;

            Ok(PagePlan {
                path,
                page_number,
                total_pages,
                offset: group.offset,
                page_size,
                previous_path: routing::path(kind, page_number - 1, total_pages),
                next_path: routing::path(kind, page_number + 1, total_pages),
                metadata: base_metadata.clone(),
            })
        })
        .collect()
}
