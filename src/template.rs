//! Template interpolation for site definitions
//!
//! Handles `{{ variable }}` interpolation in component paths and credentials.
//! Supports nested access like `{{ post_type }}` and `{{ env.WP_TOKEN }}`.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Variables addressed by name (e.g. `post_type`, `taxonomy`)
    pub vars: Value,
    /// Environment snapshot addressed as `env.NAME`
    pub env: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose `env.*` lookups read the process environment
    pub fn from_process_env() -> Self {
        Self {
            vars: Value::Null,
            env: std::env::vars().collect(),
        }
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        if !self.vars.is_object() {
            self.vars = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = &mut self.vars {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Builder-style variant of `set_var`
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_var(key, value);
        self
    }

    /// Set an environment entry
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get a value by path (e.g., "post_type" or "env.WP_TOKEN")
    pub fn get(&self, path: &str) -> Option<Value> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["env", name] => self.env.get(*name).cloned().map(Value::String),
            _ => get_nested_value(&self.vars, &parts).cloned(),
        }
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let (Some(full_match), Some(var_path)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        match ctx.get(var_path.as_str()) {
            Some(value) => {
                let replacement = value_to_string(&value);
                result = result.replace(full_match.as_str(), &replacement);
            }
            None => {
                errors.push(var_path.as_str().to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        let ctx = TemplateContext::new().with_var("post_type", "emploi");

        let result = render("./src/templates/post-{{ post_type }}.jsx", &ctx).unwrap();
        assert_eq!(result, "./src/templates/post-emploi.jsx");
    }

    #[test]
    fn test_multiple_substitutions() {
        let ctx = TemplateContext::new()
            .with_var("taxonomy", "competence")
            .with_var("connection", "emplois");

        let result = render("taxonomy-{{ taxonomy }}-{{connection}}.jsx", &ctx).unwrap();
        assert_eq!(result, "taxonomy-competence-emplois.jsx");
    }

    #[test]
    fn test_env_lookup() {
        let mut ctx = TemplateContext::new();
        ctx.set_env("WP_TOKEN", "s3cret");

        let result = render("Bearer {{ env.WP_TOKEN }}", &ctx).unwrap();
        assert_eq!(result, "Bearer s3cret");
    }

    #[test]
    fn test_missing_env_is_undefined() {
        let ctx = TemplateContext::new();
        let err = render("{{ env.NOPE }}", &ctx).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
    }

    #[test]
    fn test_undefined_variable() {
        let ctx = TemplateContext::new().with_var("post_type", "post");
        let result = render("{{ taxonomy }}", &ctx);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("taxonomy"));
    }

    #[test]
    fn test_no_templates() {
        let ctx = TemplateContext::new();
        let result = render("./src/templates/page.jsx", &ctx).unwrap();
        assert_eq!(result, "./src/templates/page.jsx");
    }

    #[test]
    fn test_number_substitution() {
        let ctx = TemplateContext::new().with_var("page", 3);
        assert_eq!(render("/blog/{{ page }}", &ctx).unwrap(), "/blog/3");
    }
}
