//! YAML parser for site definitions
//!
//! Parses and validates site definition files.

use super::types::{definition_error, PostTypeDefinition, SiteDefinition, TaxonomyDefinition, PAGES_KEY};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a site definition from a YAML file
pub fn load_site(path: impl AsRef<Path>) -> Result<SiteDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read site definition '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_site_from_str(&content)
}

/// Load a site definition from a YAML string
pub fn load_site_from_str(yaml: &str) -> Result<SiteDefinition> {
    let def: SiteDefinition = serde_yaml::from_str(yaml)?;

    validate_site(&def)?;
    Ok(def)
}

/// Validate a site definition
fn validate_site(def: &SiteDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Site name cannot be empty"));
    }

    let endpoint = url::Url::parse(&def.endpoint)
        .map_err(|e| definition_error(&def.name, format!("invalid endpoint '{}': {e}", def.endpoint)))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(definition_error(&def.name, "endpoint must be an http(s) URL"));
    }

    if let Some(size) = def.page_size {
        if size <= 0 {
            return Err(definition_error(
                &def.name,
                format!("page_size must be positive, got {size}"),
            ));
        }
    }

    if def.concurrency == 0 {
        return Err(definition_error(&def.name, "concurrency must be at least 1"));
    }

    if def.pages.is_none() && def.post_types.is_empty() && def.taxonomies.is_empty() {
        return Err(definition_error(&def.name, "nothing to build"));
    }

    if let Some(pages) = &def.pages {
        def.component(&pages.template, &[])
            .map_err(|e| definition_error(&def.name, format!("pages template: {e}")))?;
    }

    let mut names = HashSet::new();
    let mut archives = HashSet::new();
    for post_type in &def.post_types {
        validate_post_type(def, post_type)?;
        if !names.insert(post_type.name.as_str()) {
            return Err(definition_error(
                &def.name,
                format!("duplicate post type '{}'", post_type.name),
            ));
        }
        if !post_type.root && !archives.insert(post_type.archive_name()) {
            return Err(definition_error(
                &def.name,
                format!("duplicate archive '{}'", post_type.archive_name()),
            ));
        }
    }

    if def.post_types.iter().filter(|p| p.root).count() > 1 {
        return Err(definition_error(&def.name, "only one post type can be root"));
    }

    let mut taxonomies = HashSet::new();
    for taxonomy in &def.taxonomies {
        validate_taxonomy(def, taxonomy)?;
        if !taxonomies.insert(taxonomy.name.as_str()) {
            return Err(definition_error(
                &def.name,
                format!("duplicate taxonomy '{}'", taxonomy.name),
            ));
        }
    }

    Ok(())
}

/// Validate a post type definition
fn validate_post_type(def: &SiteDefinition, post_type: &PostTypeDefinition) -> Result<()> {
    if post_type.name.is_empty() {
        return Err(definition_error(&def.name, "post type name cannot be empty"));
    }
    if post_type.name == PAGES_KEY {
        return Err(definition_error(
            &def.name,
            format!("post type name '{PAGES_KEY}' is reserved"),
        ));
    }
    if post_type.field.is_empty() {
        return Err(definition_error(
            &def.name,
            format!("post type '{}' field cannot be empty", post_type.name),
        ));
    }
    if !post_type.root && post_type.archive_name().trim_matches('/').is_empty() {
        return Err(definition_error(
            &def.name,
            format!("post type '{}' archive cannot be empty", post_type.name),
        ));
    }

    let vars = [("post_type", post_type.name.as_str())];
    for template in [post_type.single_template(), post_type.archive_template()] {
        def.component(template, &vars).map_err(|e| {
            definition_error(&def.name, format!("post type '{}': {e}", post_type.name))
        })?;
    }

    Ok(())
}

/// Validate a taxonomy definition
fn validate_taxonomy(def: &SiteDefinition, taxonomy: &TaxonomyDefinition) -> Result<()> {
    if taxonomy.name.is_empty() {
        return Err(definition_error(&def.name, "taxonomy name cannot be empty"));
    }
    if taxonomy.field.is_empty() {
        return Err(definition_error(
            &def.name,
            format!("taxonomy '{}' field cannot be empty", taxonomy.name),
        ));
    }
    if taxonomy.connections.is_empty() {
        return Err(definition_error(
            &def.name,
            format!("taxonomy '{}' needs at least one connection", taxonomy.name),
        ));
    }

    let unique: HashSet<_> = taxonomy.connections.iter().collect();
    if unique.len() != taxonomy.connections.len() {
        return Err(definition_error(
            &def.name,
            format!("taxonomy '{}' lists a connection twice", taxonomy.name),
        ));
    }

    for connection in &taxonomy.connections {
        let vars = [
            ("taxonomy", taxonomy.name.as_str()),
            ("connection", connection.as_str()),
        ];
        def.component(&taxonomy.template, &vars).map_err(|e| {
            definition_error(&def.name, format!("taxonomy '{}': {e}", taxonomy.name))
        })?;
    }

    Ok(())
}
