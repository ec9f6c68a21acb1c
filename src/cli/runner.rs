//! CLI runner - executes commands

use crate::auth::Authenticator;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::emit::{JsonLinesEmitter, PageEmitter};
use crate::engine::SiteEngine;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::loader::{load_site, SiteDefinition};
use crate::plan;
use crate::routing::{RouteKind, SeparatorPolicy};
use crate::source::{ContentSource, GraphqlSource, SnapshotSource};
use crate::template::TemplateContext;
use crate::types::Metadata;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Build {
                snapshot,
                output,
                concurrency,
            } => {
                self.build(snapshot.as_deref(), output.as_deref(), *concurrency)
                    .await
            }
            Commands::Validate => self.validate(),
            Commands::Queries => self.queries(),
            Commands::Routes {
                items,
                page_size,
                kind,
                ensure_slash,
            } => self.routes(*items, *page_size, kind, *ensure_slash),
        }
    }

    /// Load site definition
    fn load_site(&self) -> Result<SiteDefinition> {
        let path = self
            .cli
            .site
            .as_ref()
            .ok_or_else(|| Error::config("Site definition not specified (use -s flag)"))?;
        load_site(path)
    }

    /// Build every page of the site
    async fn build(
        &self,
        snapshot: Option<&Path>,
        output: Option<&Path>,
        concurrency: Option<usize>,
    ) -> Result<()> {
        let site = self.load_site()?;

        let source: Arc<dyn ContentSource> = match snapshot {
            Some(path) => {
                info!("Reading content from snapshot {}", path.display());
                Arc::new(SnapshotSource::from_path(path)?)
            }
            None => Arc::new(Self::graphql_source(&site)?),
        };

        let emitter: Arc<dyn PageEmitter> = match output {
            Some(path) => Arc::new(JsonLinesEmitter::create(path)?),
            None => Arc::new(JsonLinesEmitter::stdout()),
        };

        let mut engine = SiteEngine::new(site, source, emitter);
        if let Some(n) = concurrency {
            engine = engine.with_concurrency(n);
        }
        let report = engine.run().await?;

        // stdout carries the records unless they went to a file
        if let Some(path) = output {
            let mut message = serde_json::to_value(&report)?;
            message["output"] = json!(path.display().to_string());
            self.output_message(&message);
        }

        Ok(())
    }

    /// Validate site definition
    fn validate(&self) -> Result<()> {
        let site = self.load_site()?;
        let catalog = site.catalog()?;
        site.auth_config(&TemplateContext::from_process_env())?;

        self.output_message(&json!({
            "site": site.name,
            "valid": true,
            "endpoint": site.endpoint,
            "postTypes": site.post_types.len(),
            "taxonomies": site.taxonomies.len(),
            "queries": catalog.documents().len(),
        }));

        Ok(())
    }

    /// Print the generated GraphQL documents
    fn queries(&self) -> Result<()> {
        let site = self.load_site()?;

        for (name, query) in site.catalog()?.documents() {
            self.output_message(&json!({ "name": name, "query": query }));
        }

        Ok(())
    }

    /// Print the archive pages of a collection of `items` items
    fn routes(&self, items: usize, page_size: i64, kind: &RouteKind, ensure_slash: bool) -> Result<()> {
        let kind = match kind {
            RouteKind::Term { uri, .. } if ensure_slash => {
                RouteKind::term_with(uri.clone(), SeparatorPolicy::EnsureSlash)
            }
            other => other.clone(),
        };

        let collection = vec![(); items];
        for page in plan::build(&collection, page_size, &kind, &Metadata::new())? {
            self.output_message(&json!({
                "path": page.path,
                "pageNumber": page.page_number,
                "numberOfPages": page.total_pages,
                "offset": page.offset,
                "previousPagePath": page.previous_path,
                "nextPagePath": page.next_path,
            }));
        }

        Ok(())
    }

    /// Content source for the site's GraphQL endpoint
    fn graphql_source(site: &SiteDefinition) -> Result<GraphqlSource> {
        let auth = site.auth_config(&TemplateContext::from_process_env())?;
        let client = HttpClient::with_auth(site.http_config(), Authenticator::new(auth))?;
        GraphqlSource::new(client, &site.endpoint, Arc::new(site.catalog()?))
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
