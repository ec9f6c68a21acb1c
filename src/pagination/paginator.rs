//! Paginator implementation
//!
//! Chunks an ordered slice into page groups.

use super::types::PageGroup;
use crate::error::{Error, Result};

/// Validate a page size coming from configuration or the CMS.
///
/// Page sizes are signed because the CMS reports them as a GraphQL `Int`.
pub fn validate_page_size(page_size: i64) -> Result<usize> {
    if page_size <= 0 {
        return Err(Error::invalid_argument(
            "page_size",
            format!("must be a positive integer, got {page_size}"),
        ));
    }
    usize::try_from(page_size).map_err(|_| {
        Error::invalid_argument("page_size", format!("{page_size} does not fit in usize"))
    })
}

/// Split `items` into ordered page groups of `page_size` items.
///
/// An empty collection yields no groups. Fails with `InvalidArgument` when
/// `page_size <= 0`.
pub fn paginate<T>(items: &[T], page_size: i64) -> Result<Vec<PageGroup<'_, T>>> {
    let size = validate_page_size(page_size)?;

    Ok(items
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| PageGroup {
            number: index + 1,
            offset: index * size,
            items: chunk,
        })
        .collect())
}

/// Number of page groups `paginate` would produce for `len` items.
pub fn page_count(len: usize, page_size: i64) -> Result<usize> {
    let size = validate_page_size(page_size)?;
    Ok(len.div_ceil(size))
}
