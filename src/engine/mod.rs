//! Site engine module
//!
//! Fetches a site's content, plans every page and emits the records.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SiteEngine` - Orchestrates fetch, planning and emission
//! - `SitePlan` - Every record of a build, checked for path collisions
//! - `BuildReport` - Counts and timing of a finished build

mod types;

pub use types::{BuildReport, PlannedPage, RecordKind, SitePlan};

use crate::emit::PageEmitter;
use crate::error::{Error, Result};
use crate::loader::{SiteDefinition, PAGES_KEY};
use crate::plan::{self, entry_records, page_records};
use crate::routing::RouteKind;
use crate::source::ContentSource;
use crate::types::{ContentNode, Metadata, TermNode};
use futures::future::try_join_all;
use futures::{stream, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a build reads from the content source
#[derive(Debug, Default)]
struct Fetched {
    page_size: i64,
    pages: Vec<ContentNode>,
    /// One collection per post type, in definition order
    posts: Vec<Vec<ContentNode>>,
    /// One term list per taxonomy, in definition order
    terms: Vec<Vec<TermNode>>,
}

/// Site engine for building every page of a site
pub struct SiteEngine {
    site: SiteDefinition,
    source: Arc<dyn ContentSource>,
    emitter: Arc<dyn PageEmitter>,
    concurrency: usize,
}

impl SiteEngine {
    /// Create a new engine. Concurrency comes from the site definition.
    pub fn new(
        site: SiteDefinition,
        source: Arc<dyn ContentSource>,
        emitter: Arc<dyn PageEmitter>,
    ) -> Self {
        let concurrency = site.concurrency.max(1);
        Self {
            site,
            source,
            emitter,
            concurrency,
        }
    }

    /// Override the number of records emitted concurrently
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The site being built
    pub fn site(&self) -> &SiteDefinition {
        &self.site
    }

    /// Fetch, plan and emit every page
    pub async fn run(&self) -> Result<BuildReport> {
        let start = Instant::now();
        info!(
            "Building site '{}' from {} source",
            self.site.name,
            self.source.name()
        );

        let plan = self.plan().await?;
        let report = BuildReport::from_plan(&self.site.name, &plan, 0);
        self.emit_all(plan).await?;

        let report = report.finished(start.elapsed().as_millis() as u64);
        info!(
            "Built {} records ({} pages, {} entries, {} archive pages, {} term pages) in {}ms",
            report.total(),
            report.pages,
            report.entries,
            report.archives,
            report.term_listings,
            report.duration_ms
        );
        Ok(report)
    }

    /// Fetch and plan every page without emitting anything
    pub async fn plan(&self) -> Result<SitePlan> {
        let fetched = self.fetch().await?;
        let plan = self.build_plan(&fetched)?;
        check_unique_paths(&plan)?;
        Ok(plan)
    }

    /// Fetch every collection once, concurrently
    async fn fetch(&self) -> Result<Fetched> {
        let source = self.source.as_ref();

        let page_size = async {
            match self.site.page_size {
                Some(size) => Ok(size),
                None => source.fetch_page_size().await,
            }
        };
        let pages = async {
            match self.site.pages {
                Some(_) => source.fetch_collection(PAGES_KEY).await,
                None => Ok(Vec::new()),
            }
        };
        let posts = try_join_all(
            self.site
                .post_types
                .iter()
                .map(|p| source.fetch_collection(&p.name)),
        );
        let terms = try_join_all(
            self.site
                .taxonomies
                .iter()
                .map(|t| source.fetch_terms(&t.name)),
        );

        let (page_size, pages, posts, terms) = futures::try_join!(page_size, pages, posts, terms)?;
        debug!(
            "Fetched page size {}, {} pages, {} post collections, {} taxonomies",
            page_size,
            pages.len(),
            posts.len(),
            terms.len()
        );

        Ok(Fetched {
            page_size,
            pages,
            posts,
            terms,
        })
    }

    /// Turn fetched content into records, in build order
    fn build_plan(&self, fetched: &Fetched) -> Result<SitePlan> {
        let site = &self.site;
        let mut planned = Vec::new();

        if let Some(pages) = &site.pages {
            let component = site.component(&pages.template, &[])?;
            planned.extend(
                page_records(&fetched.pages, &component)
                    .into_iter()
                    .map(|r| PlannedPage::new(RecordKind::Page, "pages", r)),
            );
        }

        for (post_type, posts) in site.post_types.iter().zip(&fetched.posts) {
            let vars = [("post_type", post_type.name.as_str())];
            let origin = format!("post type '{}'", post_type.name);

            let single = site.component(post_type.single_template(), &vars)?;
            planned.extend(
                entry_records(posts, &post_type.name, &single)
                    .into_iter()
                    .map(|r| PlannedPage::new(RecordKind::Entry, origin.clone(), r)),
            );

            let kind = if post_type.root {
                RouteKind::Root
            } else {
                RouteKind::namespaced(post_type.archive_name())
            };
            let mut metadata = Metadata::new();
            metadata.insert("postType".to_string(), post_type.name.clone().into());

            let archive = site.component(post_type.archive_template(), &vars)?;
            let archive_origin = format!("{origin} archive");
            planned.extend(
                plan::build(posts, fetched.page_size, &kind, &metadata)?
                    .into_iter()
                    .map(|p| {
                        PlannedPage::new(
                            RecordKind::Archive,
                            archive_origin.clone(),
                            p.into_record(&archive),
                        )
                    }),
            );
        }

        for (taxonomy, terms) in site.taxonomies.iter().zip(&fetched.terms) {
            for connection in &taxonomy.connections {
                let component = site.component(
                    &taxonomy.template,
                    &[
                        ("taxonomy", taxonomy.name.as_str()),
                        ("connection", connection.as_str()),
                    ],
                )?;

                for term in terms {
                    let kind = RouteKind::term_with(
                        taxonomy.term_root(&term.uri, connection),
                        taxonomy.separator,
                    );
                    let mut metadata = Metadata::new();
                    metadata.insert("termID".to_string(), term.term_taxonomy_id.into());
                    metadata.insert("slug".to_string(), term.slug.clone().into());
                    metadata.insert("name".to_string(), term.name.clone().into());
                    metadata.insert("postType".to_string(), connection.clone().into());
                    metadata.insert("taxonomy".to_string(), taxonomy.name.clone().into());

                    let origin = format!("term '{}' ({}/{})", term.slug, taxonomy.name, connection);
                    planned.extend(
                        plan::build(
                            term.members_of(connection),
                            fetched.page_size,
                            &kind,
                            &metadata,
                        )?
                        .into_iter()
                        .map(|p| {
                            PlannedPage::new(
                                RecordKind::TermListing,
                                origin.clone(),
                                p.into_record(&component),
                            )
                        }),
                    );
                }
            }
        }

        Ok(SitePlan {
            page_size: fetched.page_size,
            pages: planned,
        })
    }

    /// Emit every record with bounded concurrency, in plan order
    async fn emit_all(&self, plan: SitePlan) -> Result<()> {
        let emitter = self.emitter.as_ref();
        let total = plan.len();

        stream::iter(plan.pages.into_iter().map(|p| p.record))
            .map(|record| emitter.emit(record))
            .buffered(self.concurrency)
            .try_collect::<Vec<()>>()
            .await?;

        emitter.finish().await?;
        debug!("Emitted {} records", total);
        Ok(())
    }
}

impl std::fmt::Debug for SiteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteEngine")
            .field("site", &self.site.name)
            .field("source", &self.source.name())
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

/// Fail when two records claim the same path
fn check_unique_paths(plan: &SitePlan) -> Result<()> {
    let mut seen: HashMap<&str, &PlannedPage> = HashMap::with_capacity(plan.len());
    for page in &plan.pages {
        if let Some(first) = seen.insert(&page.record.path, page) {
            return Err(Error::DuplicatePath {
                path: page.record.path.clone(),
                first: first.origin.clone(),
                second: page.origin.clone(),
                hint: duplicate_hint(&page.record.path, first.kind, page.kind),
            });
        }
    }
    Ok(())
}

/// Suggest the change that removes a path collision
fn duplicate_hint(path: &str, first: RecordKind, second: RecordKind) -> String {
    let involves = |kind| first == kind || second == kind;

    if path == "/" && involves(RecordKind::Archive) {
        if involves(RecordKind::Page) {
            "set `root: false` on the root post type, or remove the '/' page from the CMS or \
             `pages` from the site definition"
                .to_string()
        } else {
            "set `root: false` on the root post type".to_string()
        }
    } else if involves(RecordKind::Archive) {
        "give the post type a different `archive` name, or change the conflicting URI in the CMS"
            .to_string()
    } else if involves(RecordKind::TermListing) {
        "set `separator: ensure_slash` on the taxonomy, or change the term URI in the CMS"
            .to_string()
    } else {
        "change the URI of one of them in the CMS".to_string()
    }
}

#[cfg(test)]
mod tests;
