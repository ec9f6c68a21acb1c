//! Page plan module
//!
//! Turns fetched collections into page-generation records.
//!
//! # Overview
//!
//! The plan module provides:
//! - `build` - Paginates a collection and names every archive page
//! - `PagePlan` - One archive page with its offset and previous/next links
//! - `PageRecord` - What the host framework's "create page" call receives
//! - `page_records` / `entry_records` - One record per CMS page or post

mod builder;
mod entries;
mod types;

pub use builder::build;
pub use entries::{entry_records, page_records};
pub use types::{PagePlan, PageRecord};
