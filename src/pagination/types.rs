//! Pagination types
//!
//! Defines the page group returned by the paginator.

/// A contiguous slice of a collection.
///
/// Every group except possibly the last holds exactly `page_size` items.
/// Concatenating all groups of a collection in order reproduces it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGroup<'a, T> {
    /// 1-based page number
    pub number: usize,
    /// Position of the first item in the collection
    pub offset: usize,
    /// The items on this page
    pub items: &'a [T],
}

impl<'a, T> PageGroup<'a, T> {
    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items (never true for groups built by
    /// `paginate`)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if this is the first page
    pub fn is_first(&self) -> bool {
        self.number == 1
    }
}
