//! YAML Loader module
//!
//! Parse site definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `SiteDefinition` - Endpoint, credentials and the collections to build
//! - `PostTypeDefinition` / `TaxonomyDefinition` - Per-collection settings
//! - YAML parsing with validation
//!
//! # Example
//!
//! ```yaml
//! name: front
//! endpoint: https://cms.example.com/graphql
//! auth:
//!   type: bearer
//!   token: "{{ env.WP_TOKEN }}"
//! pages: {}
//! post_types:
//!   - name: post
//!     field: allWpPost
//!     root: true
//!   - name: emploi
//!     field: allWpEmploi
//! taxonomies:
//!   - name: competence
//!     field: allWpCompetence
//!     connections: [emplois, metiers]
//! ```

mod parser;
mod types;

pub use parser::{load_site, load_site_from_str};
pub use types::{
    AuthDefinition, HttpDefinition, PagesDefinition, PostTypeDefinition, SiteDefinition,
    TaxonomyDefinition, PAGES_KEY,
};
