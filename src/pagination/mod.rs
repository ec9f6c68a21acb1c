//! Pagination module
//!
//! Splits an ordered collection into fixed-size page groups.
//!
//! # Overview
//!
//! The pagination module provides:
//! - `paginate` - Turns `(items, page_size)` into ordered `PageGroup`s
//! - `page_count` - Number of groups for a collection length, without slicing
//! - `PageGroup` - A contiguous, borrowed slice of the collection

mod paginator;
mod types;

pub use paginator::{page_count, paginate, validate_page_size};
pub use types::PageGroup;
