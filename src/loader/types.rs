//! Loader types
//!
//! Declarative site definition types for YAML parsing.

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::routing::SeparatorPolicy;
use crate::source::{CollectionQuery, QueryCatalog, TermsQuery};
use crate::template::{self, TemplateContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Collection key the CMS pages are fetched under
pub const PAGES_KEY: &str = "pages";

// ============================================================================
// Site Definition
// ============================================================================

/// Top-level site definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SiteDefinition {
    /// Site name, used in logs
    pub name: String,
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Authentication for the endpoint
    #[serde(default)]
    pub auth: Option<AuthDefinition>,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Fixed page size; the CMS reading setting is used when absent
    #[serde(default)]
    pub page_size: Option<i64>,
    /// Maximum number of page records emitted concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Directory component templates live in, available as `{{ templates_dir }}`
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    /// Generic CMS pages
    #[serde(default)]
    pub pages: Option<PagesDefinition>,
    /// Post types, built in the listed order
    #[serde(default)]
    pub post_types: Vec<PostTypeDefinition>,
    /// Taxonomies, built after every post type
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyDefinition>,
}

fn default_concurrency() -> usize {
    16
}

fn default_templates_dir() -> String {
    "./src/js/templates".to_string()
}

impl SiteDefinition {
    /// Build the query catalog for every collection this site fetches
    pub fn catalog(&self) -> Result<QueryCatalog> {
        let mut catalog = QueryCatalog::new();

        if let Some(pages) = &self.pages {
            let mut query = CollectionQuery::new(PAGES_KEY, pages.operation(), &pages.field);
            query.arguments.clone_from(&pages.arguments);
            catalog.add_collection(query)?;
        }

        for post_type in &self.post_types {
            let mut query =
                CollectionQuery::new(&post_type.name, post_type.operation(), &post_type.field);
            query.arguments.clone_from(&post_type.arguments);
            catalog.add_collection(query)?;
        }

        for taxonomy in &self.taxonomies {
            catalog.add_taxonomy(TermsQuery::new(
                &taxonomy.name,
                taxonomy.operation(),
                &taxonomy.field,
                taxonomy.connections.clone(),
            ))?;
        }

        Ok(catalog)
    }

    /// HTTP client configuration for the endpoint
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries);

        builder = match self.http.rate_limit_rps {
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Resolve credentials, interpolating `{{ env.NAME }}` from `ctx`
    pub fn auth_config(&self, ctx: &TemplateContext) -> Result<AuthConfig> {
        match &self.auth {
            Some(auth) => auth.resolve(ctx),
            None => Ok(AuthConfig::None),
        }
    }

    /// Render a component template.
    ///
    /// `templates_dir` is always available; `vars` adds the rest.
    pub fn component(&self, template: &str, vars: &[(&str, &str)]) -> Result<String> {
        let mut ctx = TemplateContext::new().with_var("templates_dir", self.templates_dir.as_str());
        for (key, value) in vars {
            ctx.set_var(*key, *value);
        }
        template::render(template, &ctx)
    }

    /// The post type whose archive is served at `/`
    pub fn root_post_type(&self) -> Option<&PostTypeDefinition> {
        self.post_types.iter().find(|p| p.root)
    }
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication definition. Values may contain `{{ env.NAME }}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// No authentication
    None,
    /// API key in a header or query parameter
    ApiKey {
        /// Header or query param name
        key: String,
        /// Value (template)
        value: String,
        /// Where the key goes
        #[serde(default)]
        location: Location,
    },
    /// Bearer token
    Bearer {
        /// Token value (template)
        token: String,
    },
    /// HTTP basic authentication, e.g. a WordPress application password
    Basic {
        /// Username (template)
        username: String,
        /// Password (template)
        password: String,
    },
    /// Arbitrary headers
    Headers {
        /// Header values (templates)
        headers: HashMap<String, String>,
    },
}

impl AuthDefinition {
    /// Interpolate templates and produce the runtime auth config
    pub fn resolve(&self, ctx: &TemplateContext) -> Result<AuthConfig> {
        let config = match self {
            AuthDefinition::None => AuthConfig::None,
            AuthDefinition::ApiKey {
                key,
                value,
                location,
            } => AuthConfig::ApiKey {
                location: *location,
                name: key.clone(),
                value: template::render(value, ctx)?,
            },
            AuthDefinition::Bearer { token } => AuthConfig::Bearer {
                token: template::render(token, ctx)?,
            },
            AuthDefinition::Basic { username, password } => AuthConfig::Basic {
                username: template::render(username, ctx)?,
                password: template::render(password, ctx)?,
            },
            AuthDefinition::Headers { headers } => AuthConfig::CustomHeaders {
                headers: headers
                    .iter()
                    .map(|(k, v)| template::render(v, ctx).map(|v| (k.clone(), v)))
                    .collect::<Result<_>>()?,
            },
        };
        Ok(config)
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            rate_limit_rps: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

// ============================================================================
// Content Definitions
// ============================================================================

/// Generic CMS pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PagesDefinition {
    /// GraphQL operation name, defaults to the field name
    #[serde(default)]
    pub operation: Option<String>,
    /// Root field holding the page nodes
    #[serde(default = "default_pages_field")]
    pub field: String,
    /// Raw field arguments
    #[serde(default)]
    pub arguments: Option<String>,
    /// Page component template
    #[serde(default = "default_page_template")]
    pub template: String,
}

impl PagesDefinition {
    /// GraphQL operation name
    pub fn operation(&self) -> &str {
        self.operation.as_deref().unwrap_or(&self.field)
    }
}

fn default_pages_field() -> String {
    "allWpPage".to_string()
}

fn default_page_template() -> String {
    "{{ templates_dir }}/page.jsx".to_string()
}

/// One post type: its entries and its paginated archive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PostTypeDefinition {
    /// Post type name, also the collection key
    pub name: String,
    /// GraphQL operation name, defaults to the field name
    #[serde(default)]
    pub operation: Option<String>,
    /// Root field holding the post nodes (e.g. `allWpPost`)
    pub field: String,
    /// Raw field arguments
    #[serde(default = "default_post_arguments")]
    pub arguments: Option<String>,
    /// Serve this archive at `/`, `/blog/2`, ...
    #[serde(default)]
    pub root: bool,
    /// Archive namespace, defaults to the post type name
    #[serde(default)]
    pub archive: Option<String>,
    /// Single post component template
    #[serde(default)]
    pub single_template: Option<String>,
    /// Archive component template
    #[serde(default)]
    pub archive_template: Option<String>,
}

fn default_post_arguments() -> Option<String> {
    Some("sort: { date: DESC }".to_string())
}

impl PostTypeDefinition {
    /// GraphQL operation name
    pub fn operation(&self) -> &str {
        self.operation.as_deref().unwrap_or(&self.field)
    }

    /// Archive namespace for non-root post types
    pub fn archive_name(&self) -> &str {
        self.archive.as_deref().unwrap_or(&self.name)
    }

    /// Single post template, `post.jsx` for the root type and
    /// `post-{{ post_type }}.jsx` otherwise
    pub fn single_template(&self) -> &str {
        match (&self.single_template, self.root) {
            (Some(t), _) => t,
            (None, true) => "{{ templates_dir }}/post.jsx",
            (None, false) => "{{ templates_dir }}/post-{{ post_type }}.jsx",
        }
    }

    /// Archive template, `archive.jsx` for the root type and
    /// `archive-{{ post_type }}.jsx` otherwise
    pub fn archive_template(&self) -> &str {
        match (&self.archive_template, self.root) {
            (Some(t), _) => t,
            (None, true) => "{{ templates_dir }}/archive.jsx",
            (None, false) => "{{ templates_dir }}/archive-{{ post_type }}.jsx",
        }
    }
}

/// A taxonomy whose terms get paginated listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaxonomyDefinition {
    /// Taxonomy name
    pub name: String,
    /// GraphQL operation name, defaults to the field name
    #[serde(default)]
    pub operation: Option<String>,
    /// Root field holding the term nodes (e.g. `allWpCategory`)
    pub field: String,
    /// Connection fields linking terms to content (e.g. `posts`)
    pub connections: Vec<String>,
    /// How page numbers are appended to term URIs
    #[serde(default)]
    pub separator: SeparatorPolicy,
    /// Listing component template
    #[serde(default = "default_taxonomy_template")]
    pub template: String,
}

fn default_taxonomy_template() -> String {
    "{{ templates_dir }}/taxonomy-{{ taxonomy }}.jsx".to_string()
}

impl TaxonomyDefinition {
    /// GraphQL operation name
    pub fn operation(&self) -> &str {
        self.operation.as_deref().unwrap_or(&self.field)
    }

    /// Route a term's listing for one connection.
    ///
    /// With a single connection the listing sits at the term URI. With
    /// several, each connection gets its own `{uri}{connection}/` root so
    /// the listings never share a path.
    pub fn term_root(&self, term_uri: &str, connection: &str) -> String {
        if self.connections.len() <= 1 {
            return term_uri.to_string();
        }
        if term_uri.ends_with('/') {
            format!("{term_uri}{connection}/")
        } else {
            format!("{term_uri}/{connection}/")
        }
    }
}

/// Convert a definition error into a config error naming the site
pub(crate) fn definition_error(site: &str, message: impl std::fmt::Display) -> Error {
    Error::config(format!("site '{site}': {message}"))
}
