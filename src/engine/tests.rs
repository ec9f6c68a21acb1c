//! Tests for engine module

use super::*;
use crate::emit::CollectingEmitter;
use crate::loader::load_site_from_str;
use crate::plan::PageRecord;
use crate::source::{Snapshot, SnapshotSource};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const SITE: &str = r#"
name: front
endpoint: http://localhost/graphql
pages: {}
post_types:
  - name: post
    field: allWpPost
    root: true
  - name: emploi
    field: allWpEmploi
taxonomies:
  - name: category
    field: allWpCategory
    connections: [posts]
  - name: competence
    field: allWpCompetence
    connections: [emplois, metiers]
"#;

fn nodes(prefix: &str, n: usize) -> Vec<ContentNode> {
    (1..=n)
        .map(|i| ContentNode::new(format!("{prefix}{i}"), format!("/{prefix}/{i}/")))
        .collect()
}

fn term(slug: &str, uri: &str, id: i64, members: &[(&str, usize)]) -> TermNode {
    TermNode {
        id: format!("term-{slug}"),
        name: slug.to_uppercase(),
        uri: uri.to_string(),
        slug: slug.to_string(),
        term_taxonomy_id: id,
        members: members
            .iter()
            .map(|(conn, n)| ((*conn).to_string(), nodes(conn, *n)))
            .collect(),
    }
}

fn snapshot() -> Snapshot {
    let mut snapshot = Snapshot {
        page_size: 10,
        ..Snapshot::default()
    };
    snapshot.collections.insert("pages".into(), nodes("page", 2));
    snapshot.collections.insert("post".into(), nodes("post", 23));
    snapshot.collections.insert("emploi".into(), nodes("emploi", 5));
    snapshot.terms.insert(
        "category".into(),
        vec![
            term("news", "/category/news/", 4, &[("posts", 11)]),
            term("empty", "/category/empty/", 5, &[("posts", 0)]),
        ],
    );
    snapshot.terms.insert(
        "competence".into(),
        vec![term(
            "soudure",
            "/competence/soudure/",
            31,
            &[("emplois", 3), ("metiers", 12)],
        )],
    );
    snapshot
}

/// Counts every fetch made through it
struct CountingSource {
    inner: SnapshotSource,
    fetches: Mutex<Vec<String>>,
    page_size_calls: AtomicUsize,
}

impl CountingSource {
    fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: SnapshotSource::new(snapshot),
            fetches: Mutex::new(Vec::new()),
            page_size_calls: AtomicUsize::new(0),
        }
    }

    fn fetched(&self) -> Vec<String> {
        let mut fetched = self.fetches.lock().unwrap().clone();
        fetched.sort();
        fetched
    }
}

#[async_trait]
impl ContentSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    async fn fetch_collection(&self, key: &str) -> Result<Vec<ContentNode>> {
        self.fetches.lock().unwrap().push(format!("collection:{key}"));
        self.inner.fetch_collection(key).await
    }

    async fn fetch_page_size(&self) -> Result<i64> {
        self.page_size_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_page_size().await
    }

    async fn fetch_terms(&self, taxonomy: &str) -> Result<Vec<TermNode>> {
        self.fetches.lock().unwrap().push(format!("terms:{taxonomy}"));
        self.inner.fetch_terms(taxonomy).await
    }
}

/// Fails on a chosen path
struct FailingEmitter {
    fail_on: String,
    emitted: AtomicUsize,
}

#[async_trait]
impl PageEmitter for FailingEmitter {
    async fn emit(&self, record: PageRecord) -> Result<()> {
        if record.path == self.fail_on {
            return Err(Error::emit(record.path, "rejected"));
        }
        self.emitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn engine(
    yaml: &str,
    source: Arc<dyn ContentSource>,
) -> (SiteEngine, Arc<CollectingEmitter>) {
    let site = load_site_from_str(yaml).unwrap();
    let emitter = Arc::new(CollectingEmitter::new());
    (SiteEngine::new(site, source, emitter.clone()), emitter)
}

// ============================================================================
// Build Tests
// ============================================================================

#[tokio::test]
async fn test_full_build_counts() {
    let source = Arc::new(CountingSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source.clone());

    let report = engine.run().await.unwrap();

    // 23 posts over 10 per page, 5 emplois in 1 page
    // news: 11 posts -> 2 pages; empty: none; soudure: 3 emplois -> 1, 12 metiers -> 2
    assert_eq!(report.site, "front");
    assert_eq!(report.page_size, 10);
    assert_eq!(report.pages, 2);
    assert_eq!(report.entries, 28);
    assert_eq!(report.archives, 4);
    assert_eq!(report.term_listings, 5);
    assert_eq!(report.total(), 39);
    assert_eq!(emitter.len(), 39);
}

#[tokio::test]
async fn test_run_emits_the_planned_records() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    let planned: Vec<PageRecord> = engine
        .plan()
        .await
        .unwrap()
        .pages
        .into_iter()
        .map(|p| p.record)
        .collect();
    let before = chrono::Utc::now();
    let report = engine.run().await.unwrap();

    assert_eq!(emitter.records(), planned);
    assert_eq!(report.total(), planned.len());
    assert!(report.generated_at >= before);
}

#[test]
fn test_report_finished_stamps_duration() {
    let plan = SitePlan {
        page_size: 10,
        pages: vec![PlannedPage::new(
            RecordKind::Page,
            "pages",
            PageRecord::new("/about/", "page.jsx", Metadata::new()),
        )],
    };

    let report = BuildReport::from_plan("front", &plan, 0);
    assert_eq!(report.pages, 1);
    assert_eq!(report.duration_ms, 0);

    let report = report.finished(42);
    assert_eq!(report.duration_ms, 42);
    assert_eq!(report.total(), 1);
}

#[tokio::test]
async fn test_each_collection_fetched_once() {
    let source = Arc::new(CountingSource::new(snapshot()));
    let (engine, _) = engine(SITE, source.clone());

    engine.run().await.unwrap();

    assert_eq!(
        source.fetched(),
        vec![
            "collection:emploi",
            "collection:pages",
            "collection:post",
            "terms:category",
            "terms:competence"
        ]
    );
    assert_eq!(source.page_size_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_size_override_skips_fetch() {
    let source = Arc::new(CountingSource::new(snapshot()));
    let yaml = SITE.replace("pages: {}", "page_size: 5\npages: {}");
    let (engine, _) = engine(&yaml, source.clone());

    let report = engine.run().await.unwrap();

    assert_eq!(report.page_size, 5);
    // 23 posts -> 5 pages, 5 emplois -> 1 page
    assert_eq!(report.archives, 6);
    assert_eq!(source.page_size_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_emission_order_and_paths() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    engine.run().await.unwrap();
    let paths = emitter.paths();

    assert_eq!(&paths[..2], &["/page/1/", "/page/2/"]);
    assert_eq!(paths[2], "/post/1/");
    let archive_start = 2 + 23;
    assert_eq!(
        &paths[archive_start..archive_start + 3],
        &["/", "/blog/2", "/blog/3"]
    );
    assert!(paths.contains(&"/emploi".to_string()));
    assert!(!paths.contains(&"/emploi/2".to_string()));

    let tail: Vec<&str> = paths[paths.len() - 5..].iter().map(String::as_str).collect();
    assert_eq!(
        tail,
        vec![
            "/category/news/",
            "/category/news/2",
            "/competence/soudure/emplois/",
            "/competence/soudure/metiers/",
            "/competence/soudure/metiers/2",
        ]
    );
}

#[tokio::test]
async fn test_archive_record_context() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    engine.run().await.unwrap();
    let records = emitter.records();
    let blog2 = records.iter().find(|r| r.path == "/blog/2").unwrap();

    assert_eq!(blog2.component, "./src/js/templates/archive.jsx");
    assert_eq!(blog2.get("offset"), Some(&json!(10)));
    assert_eq!(blog2.get("postsPerPage"), Some(&json!(10)));
    assert_eq!(blog2.get("postType"), Some(&json!("post")));
    assert_eq!(blog2.get("previousPagePath"), Some(&json!("/")));
    assert_eq!(blog2.get("nextPagePath"), Some(&json!("/blog/3")));
}

#[tokio::test]
async fn test_term_record_context() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    engine.run().await.unwrap();
    let records = emitter.records();
    let news = records.iter().find(|r| r.path == "/category/news/").unwrap();

    assert_eq!(news.component, "./src/js/templates/taxonomy-category.jsx");
    assert_eq!(news.get("termID"), Some(&json!(4)));
    assert_eq!(news.get("slug"), Some(&json!("news")));
    assert_eq!(news.get("name"), Some(&json!("NEWS")));
    assert_eq!(news.get("taxonomy"), Some(&json!("category")));
    assert_eq!(news.get("postType"), Some(&json!("posts")));
    assert_eq!(news.get("nextPagePath"), Some(&json!("/category/news/2")));
    assert_eq!(news.get("previousPagePath"), Some(&json!(null)));
}

#[tokio::test]
async fn test_entry_record_context() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    engine.run().await.unwrap();
    let records = emitter.records();
    let entry = records.iter().find(|r| r.path == "/emploi/2/").unwrap();

    assert_eq!(entry.component, "./src/js/templates/post-emploi.jsx");
    assert_eq!(entry.get("postType"), Some(&json!("emploi")));
    assert_eq!(entry.get("previousPostId"), Some(&json!("emploi1")));
    assert_eq!(entry.get("nextPostId"), Some(&json!("emploi3")));
}

#[tokio::test]
async fn test_empty_collections_emit_nothing() {
    let mut empty = Snapshot {
        page_size: 10,
        ..Snapshot::default()
    };
    empty.collections.insert("pages".into(), Vec::new());
    empty.collections.insert("post".into(), Vec::new());
    empty.collections.insert("emploi".into(), Vec::new());
    empty.terms.insert("category".into(), Vec::new());
    empty.terms.insert("competence".into(), Vec::new());

    let (engine, emitter) = engine(SITE, Arc::new(SnapshotSource::new(empty)));
    let report = engine.run().await.unwrap();

    assert_eq!(report.total(), 0);
    assert!(emitter.is_empty());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_source_failure_aborts_before_emission() {
    let mut broken = snapshot();
    broken.terms.remove("competence");

    let (engine, emitter) = engine(SITE, Arc::new(SnapshotSource::new(broken)));
    let err = engine.run().await.unwrap_err();

    assert!(err.is_source_error());
    assert!(emitter.is_empty());
}

#[tokio::test]
async fn test_invalid_page_size_from_source() {
    let mut snapshot = snapshot();
    snapshot.page_size = 0;

    let (engine, emitter) = engine(SITE, Arc::new(SnapshotSource::new(snapshot)));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(emitter.is_empty());
}

#[tokio::test]
async fn test_duplicate_path_rejected() {
    let mut snapshot = snapshot();
    // a CMS page sitting on the emploi archive root
    snapshot
        .collections
        .insert("pages".into(), vec![ContentNode::new("page-x", "/emploi")]);

    let (engine, emitter) = engine(SITE, Arc::new(SnapshotSource::new(snapshot)));
    let err = engine.run().await.unwrap_err();

    match err {
        Error::DuplicatePath {
            path,
            first,
            second,
            hint,
        } => {
            assert_eq!(path, "/emploi");
            assert_eq!(first, "pages");
            assert_eq!(second, "post type 'emploi' archive");
            assert!(hint.contains("`archive` name"), "{hint}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(emitter.is_empty());
}

#[tokio::test]
async fn test_home_page_colliding_with_root_archive_suggests_fix() {
    let mut snapshot = snapshot();
    snapshot
        .collections
        .insert("pages".into(), vec![ContentNode::new("home", "/")]);

    let (engine, emitter) = engine(SITE, Arc::new(SnapshotSource::new(snapshot)));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(&err, Error::DuplicatePath { path, .. } if path == "/"));
    let message = err.to_string();
    assert!(message.contains("post type 'post' archive"), "{message}");
    assert!(message.contains("`root: false`"), "{message}");
    assert!(message.contains("`pages`"), "{message}");
    assert!(emitter.is_empty());
}

#[test]
fn test_duplicate_hint_per_collision() {
    assert_eq!(
        duplicate_hint("/", RecordKind::Archive, RecordKind::Entry),
        "set `root: false` on the root post type"
    );
    assert!(duplicate_hint("/category/news/2", RecordKind::TermListing, RecordKind::Entry)
        .contains("`separator: ensure_slash`"));
    assert!(duplicate_hint("/about/", RecordKind::Page, RecordKind::Entry)
        .contains("change the URI"));
}

#[tokio::test]
async fn test_emit_failure_aborts() {
    let site = load_site_from_str(SITE).unwrap();
    let emitter = Arc::new(FailingEmitter {
        fail_on: "/blog/2".to_string(),
        emitted: AtomicUsize::new(0),
    });
    let engine = SiteEngine::new(
        site,
        Arc::new(SnapshotSource::new(snapshot())),
        emitter.clone(),
    )
    .with_concurrency(1);

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, Error::Emit { ref path, .. } if path == "/blog/2"));
    // pages, post entries and the first archive page went out before the failure
    assert_eq!(emitter.emitted.load(Ordering::SeqCst), 2 + 23 + 1);
}

// ============================================================================
// Plan Tests
// ============================================================================

#[tokio::test]
async fn test_plan_does_not_emit() {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    let (engine, emitter) = engine(SITE, source);

    let plan = engine.plan().await.unwrap();

    assert_eq!(plan.len(), 39);
    assert_eq!(plan.count(RecordKind::TermListing), 5);
    assert_eq!(plan.paths()[0], "/page/1/");
    assert!(emitter.is_empty());
}

#[test]
fn test_record_kind_display() {
    assert_eq!(RecordKind::TermListing.to_string(), "term listing");
    assert_eq!(RecordKind::Archive.to_string(), "archive");
}

#[test]
fn test_engine_debug() {
    let site = load_site_from_str(SITE).unwrap();
    let engine = SiteEngine::new(
        site,
        Arc::new(SnapshotSource::new(Snapshot::default())),
        Arc::new(CollectingEmitter::new()),
    )
    .with_concurrency(0);

    let debug = format!("{engine:?}");
    assert!(debug.contains("front"));
    assert!(debug.contains("concurrency: 1"));
}
