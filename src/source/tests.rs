//! Tests for the content source module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::{BackoffType, ContentNode};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog() -> QueryCatalog {
    let mut catalog = QueryCatalog::new();
    catalog
        .add_collection(
            CollectionQuery::new("post", "WpPosts", "allWpPost")
                .with_arguments("sort: { date: DESC }"),
        )
        .unwrap();
    catalog
        .add_collection(CollectionQuery::new("pages", "WpPages", "allWpPage"))
        .unwrap();
    catalog
        .add_taxonomy(TermsQuery::new(
            "competence",
            "WpCompetences",
            "allWpCompetence",
            vec!["emplois".to_string(), "metiers".to_string()],
        ))
        .unwrap();
    catalog
}

async fn source_for(server: &MockServer) -> GraphqlSource {
    let config = HttpClientConfig::builder()
        .no_rate_limit()
        .max_retries(1)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();
    GraphqlSource::new(client, format!("{}/graphql", server.uri()), Arc::new(catalog())).unwrap()
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test]
fn test_collection_document() {
    let catalog = catalog();
    assert_eq!(
        catalog.collection("post").unwrap().document(),
        "query WpPosts { allWpPost(sort: { date: DESC }) { nodes { id uri } } }"
    );
    assert_eq!(
        catalog.collection("pages").unwrap().document(),
        "query WpPages { allWpPage { nodes { id uri } } }"
    );
}

#[test]
fn test_terms_document_selects_every_connection() {
    let catalog = catalog();
    assert_eq!(
        catalog.taxonomy("competence").unwrap().document(),
        "query WpCompetences { allWpCompetence { nodes { id name uri slug termTaxonomyId \
         emplois { nodes { id uri } } metiers { nodes { id uri } } } } }"
    );
}

#[test]
fn test_catalog_rejects_duplicates_and_unknown_keys() {
    let mut catalog = catalog();
    let err = catalog
        .add_collection(CollectionQuery::new("post", "Other", "allOther"))
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));

    assert!(catalog.collection("formation").is_err());
    assert!(catalog.taxonomy("category").is_err());
}

#[test]
fn test_catalog_documents_order() {
    let labels: Vec<String> = catalog().documents().into_iter().map(|(l, _)| l).collect();
    assert_eq!(
        labels,
        vec![
            "page_size",
            "collection:post",
            "collection:pages",
            "taxonomy:competence"
        ]
    );
}

// ============================================================================
// GraphQL Source Tests
// ============================================================================

#[tokio::test]
async fn test_graphql_fetch_collection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "query": "query WpPosts { allWpPost(sort: { date: DESC }) { nodes { id uri } } }"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"allWpPost": {"nodes": [
                {"id": "p2", "uri": "/p2/"},
                {"id": "p1", "uri": "/p1/"}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let posts = source.fetch_collection("post").await.unwrap();

    assert_eq!(
        posts,
        vec![ContentNode::new("p2", "/p2/"), ContentNode::new("p1", "/p1/")]
    );
}

#[tokio::test]
async fn test_graphql_fetch_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "query": PAGE_SIZE_QUERY })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"wp": {"readingSettings": {"postsPerPage": 12}}}
        })))
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    assert_eq!(source.fetch_page_size().await.unwrap(), 12);
}

#[tokio::test]
async fn test_graphql_fetch_terms() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"allWpCompetence": {"nodes": [{
                "id": "t1",
                "name": "Soudure",
                "uri": "/competence/soudure/",
                "slug": "soudure",
                "termTaxonomyId": 31,
                "emplois": {"nodes": [{"id": "e1", "uri": "/emploi/e1/"}]},
                "metiers": null
            }]}}
        })))
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let terms = source.fetch_terms("competence").await.unwrap();

    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].term_taxonomy_id, 31);
    assert_eq!(terms[0].members_of("emplois"), &[ContentNode::new("e1", "/emploi/e1/")]);
    assert!(terms[0].members_of("metiers").is_empty());
}

#[tokio::test]
async fn test_graphql_missing_connection_is_source_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"allWpCompetence": {"nodes": [{
                "id": "t1", "name": "Soudure", "uri": "/c/s/", "slug": "s",
                "termTaxonomyId": 31,
                "emplois": {"nodes": []}
            }]}}
        })))
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let err = source.fetch_terms("competence").await.unwrap_err();
    assert!(matches!(err, Error::Source { .. }));
    assert!(err.to_string().contains("metiers"));
}

#[tokio::test]
async fn test_graphql_errors_array_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Cannot query field \"allWpPost\""}],
            "data": null
        })))
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let err = source.fetch_collection("post").await.unwrap_err();

    assert!(matches!(err, Error::Source { .. }));
    assert!(err.to_string().contains("Cannot query field"));
}

#[tokio::test]
async fn test_graphql_missing_field_is_source_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let err = source.fetch_collection("pages").await.unwrap_err();
    assert!(err.to_string().contains("allWpPage.nodes"));
}

#[tokio::test]
async fn test_graphql_server_down_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let err = source.fetch_page_size().await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[tokio::test]
async fn test_graphql_non_json_body_is_source_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server).await;
    let err = source.fetch_page_size().await.unwrap_err();
    assert!(matches!(err, Error::Source { .. }));
}

#[tokio::test]
async fn test_graphql_unknown_collection_is_config_error() {
    let server = MockServer::start().await;
    let source = source_for(&server).await;

    let err = source.fetch_collection("formation").await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_graphql_endpoint_must_be_http() {
    let client = HttpClient::new().unwrap();
    let err = GraphqlSource::new(client, "ftp://cms/graphql", Arc::new(catalog())).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));

    let client = HttpClient::new().unwrap();
    let err = GraphqlSource::new(client, "not a url", Arc::new(catalog())).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

// ============================================================================
// Snapshot Source Tests
// ============================================================================

#[tokio::test]
async fn test_snapshot_source() {
    let source = SnapshotSource::from_json(
        r#"{
            "pageSize": 3,
            "collections": {"post": [{"id": "a", "uri": "/a/"}]},
            "terms": {"category": []}
        }"#,
    )
    .unwrap();

    assert_eq!(source.name(), "snapshot");
    assert_eq!(source.fetch_page_size().await.unwrap(), 3);
    assert_eq!(source.fetch_collection("post").await.unwrap().len(), 1);
    assert!(source.fetch_terms("category").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshot_missing_keys_are_source_errors() {
    let source = SnapshotSource::new(Snapshot {
        page_size: 10,
        ..Snapshot::default()
    });

    assert!(source.fetch_collection("post").await.unwrap_err().is_source_error());
    assert!(source.fetch_terms("category").await.unwrap_err().is_source_error());
}

#[test]
fn test_snapshot_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("snapshot.json");
    std::fs::write(&file, r#"{"pageSize": 5}"#).unwrap();

    let source = SnapshotSource::from_path(&file).unwrap();
    assert_eq!(source.snapshot().page_size, 5);

    assert!(SnapshotSource::from_path(dir.path().join("missing.json")).is_err());
}
