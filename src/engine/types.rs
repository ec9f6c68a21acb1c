//! Engine types
//!
//! Planned pages and build statistics for the site engine.

use crate::plan::PageRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What produced a page record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A generic CMS page
    Page,
    /// A single post of some post type
    Entry,
    /// A post type archive page
    Archive,
    /// A taxonomy term listing page
    TermListing,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Page => "page",
            RecordKind::Entry => "entry",
            RecordKind::Archive => "archive",
            RecordKind::TermListing => "term listing",
        };
        f.write_str(name)
    }
}

/// A record ready for emission, with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    /// Record kind
    pub kind: RecordKind,
    /// Human-readable origin, e.g. `post type 'emploi'`
    pub origin: String,
    /// The record itself
    pub record: PageRecord,
}

impl PlannedPage {
    /// Create a planned page
    pub fn new(kind: RecordKind, origin: impl Into<String>, record: PageRecord) -> Self {
        Self {
            kind,
            origin: origin.into(),
            record,
        }
    }
}

/// Every record of a build, in emission order
#[derive(Debug, Clone, Default)]
pub struct SitePlan {
    /// Items per archive page used for this build
    pub page_size: i64,
    /// Planned pages
    pub pages: Vec<PlannedPage>,
}

impl SitePlan {
    /// Number of planned pages of a kind
    pub fn count(&self, kind: RecordKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }

    /// All planned paths, in order
    pub fn paths(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.record.path.as_str()).collect()
    }

    /// Number of planned pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if nothing is planned
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Site name
    pub site: String,
    /// Items per archive page
    pub page_size: i64,
    /// Generic CMS pages emitted
    pub pages: usize,
    /// Single posts emitted
    pub entries: usize,
    /// Archive pages emitted
    pub archives: usize,
    /// Term listing pages emitted
    pub term_listings: usize,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// When the build finished
    pub generated_at: DateTime<Utc>,
}

impl BuildReport {
    /// Summarise a plan; call [`BuildReport::finished`] once it is emitted
    pub fn from_plan(site: impl Into<String>, plan: &SitePlan, duration_ms: u64) -> Self {
        Self {
            site: site.into(),
            page_size: plan.page_size,
            pages: plan.count(RecordKind::Page),
            entries: plan.count(RecordKind::Entry),
            archives: plan.count(RecordKind::Archive),
            term_listings: plan.count(RecordKind::TermListing),
            duration_ms,
            generated_at: Utc::now(),
        }
    }

    /// Stamp the wall time and finish time of the build
    #[must_use]
    pub fn finished(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self.generated_at = Utc::now();
        self
    }

    /// Total records emitted
    pub fn total(&self) -> usize {
        self.pages + self.entries + self.archives + self.term_listings
    }
}
