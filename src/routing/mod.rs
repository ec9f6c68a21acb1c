//! Routing module
//!
//! Maps `(kind, page_number, total_pages)` to canonical archive paths.
//!
//! # Path Templates
//!
//! | Kind | Page 1 | Page n |
//! |------|--------|--------|
//! | `Root` | `/` | `/blog/{n}` |
//! | `Namespaced(name)` | `/{name}` | `/{name}/{n}` |
//! | `Term { uri, .. }` | `{uri}` | `{uri}{n}` (see `SeparatorPolicy`) |

mod namer;
mod types;

pub use namer::{path, ROOT_ARCHIVE_PREFIX};
pub use types::{RouteKind, SeparatorPolicy};
