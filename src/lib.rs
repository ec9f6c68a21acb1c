// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pressplan
//!
//! Plans the pages of a static site built from a headless WordPress.
//!
//! pressplan queries a WordPress GraphQL endpoint and emits one
//! page-generation record (`path`, template `component`, `context`) per
//! page the front-end build should create: generic CMS pages, single posts,
//! paginated post-type archives and paginated taxonomy term listings.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pressplan::emit::CollectingEmitter;
//! use pressplan::engine::SiteEngine;
//! use pressplan::source::SnapshotSource;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> pressplan::Result<()> {
//!     let site = pressplan::load_site("site.yaml")?;
//!     let source = Arc::new(SnapshotSource::from_path("snapshot.json")?);
//!     let emitter = Arc::new(CollectingEmitter::new());
//!
//!     let report = SiteEngine::new(site, source, emitter.clone()).run().await?;
//!     println!("{} records", report.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────────────────────┐   ┌─────────────┐
//! │ ContentSource│──▶│            Page planning            │──▶│ PageEmitter │
//! │ GraphQL      │   │ paginate ─▶ routing::path ─▶ build  │   │ JSON lines  │
//! │ Snapshot     │   │ entry_records / page_records        │   │ Collecting  │
//! └──────────────┘   └─────────────────────────────────────┘   └─────────────┘
//!         ▲                          SiteEngine
//!   HttpClient (retry, rate limit, auth)
//! ```
//!
//! The planning core (`pagination`, `routing`, `plan`) is synchronous and
//! generic over the item type; everything async lives around it.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication for private endpoints
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Splitting collections into pages
pub mod pagination;

/// Archive path naming
pub mod routing;

/// Page plans and page records
pub mod plan;

/// Content sources (GraphQL, snapshot)
pub mod source;

/// Page record emitters
pub mod emit;

/// Build orchestration
pub mod engine;

/// YAML loader for site definitions
pub mod loader;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{BuildReport, SiteEngine};
pub use loader::{load_site, load_site_from_str, SiteDefinition};
pub use plan::{PagePlan, PageRecord};
pub use routing::{RouteKind, SeparatorPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
