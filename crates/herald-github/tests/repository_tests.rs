//! Repository identity resolution against a mock GitHub API

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use herald_config::{Credentials, GitHubConfig};
use herald_github::{GitHubApi, GitHubContext, GitHubError, Repository, RestClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: &str) -> Arc<dyn GitHubApi> {
    Arc::new(RestClient::new(server.uri(), token, Some(Duration::from_secs(5))).unwrap())
}

fn repository(server: &MockServer) -> Repository {
    Repository::new("owner", "repo", client(server, "TOKEN"))
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("discussionCategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "repository": {
                    "discussionCategories": {
                        "nodes": [
                            {"id": "123", "name": "General"},
                            {"id": "456", "name": "Other"}
                        ]
                    }
                }
            }
        })))
        .mount(server)
        .await;
}

#[test]
fn test_constructs() {
    let server_uri = "http://localhost:1";
    let client: Arc<dyn GitHubApi> =
        Arc::new(RestClient::new(server_uri, "TOKEN", Some(Duration::from_secs(1))).unwrap());
    let repo = Repository::new("owner", "repo", client);

    assert_eq!(repo.owner(), "owner");
    assert_eq!(repo.name(), "repo");
    assert_eq!(repo.full_name(), "owner/repo");
}

#[tokio::test]
async fn test_gets_category_id() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    let id = repository(&server).category_id("General").await.unwrap();
    assert_eq!(id, "123");
}

#[tokio::test]
async fn test_category_match_is_case_sensitive() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    let err = repository(&server).category_id("general").await.unwrap_err();
    match err {
        GitHubError::CategoryNotFound { category, repository } => {
            assert_eq!(category, "general");
            assert_eq!(repository, "owner/repo");
        }
        other => panic!("Expected CategoryNotFound, got: {other}"),
    }
}

#[tokio::test]
async fn test_gets_repository_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_id": "R_123"})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(repository(&server).id().await.unwrap(), "R_123");
}

#[tokio::test]
async fn test_gets_label_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels/question"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_id": "LA_123"})))
        .mount(&server)
        .await;

    assert_eq!(repository(&server).label_id("question").await.unwrap(), "LA_123");
}

#[tokio::test]
async fn test_missing_label_is_reported_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = repository(&server).label_id("missing").await.unwrap_err();
    assert!(matches!(err, GitHubError::LabelNotFound { ref label, .. } if label == "missing"));
}

#[tokio::test]
async fn test_knows_when_a_post_has_been_published() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {
                "q": "repo:owner/repo is:discussion in:title \"matched post\" created:>=2021-01-01"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "search": {
                    "nodes": [
                        {"id": "post123", "url": "https://github.com/owner/repo/discussions/1"}
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let found = repository(&server)
        .find_discussion("matched post", date)
        .await
        .unwrap()
        .expect("discussion should be found");

    assert_eq!(found.id, "post123");
    assert_eq!(found.url.as_deref(), Some("https://github.com/owner/repo/discussions/1"));
}

#[tokio::test]
async fn test_knows_when_a_post_has_not_been_published() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": []}}
        })))
        .mount(&server)
        .await;

    let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let found = repository(&server)
        .find_discussion("missing post", date)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_search_skips_non_discussion_nodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": [{}, {"id": "D_2", "url": "https://example.com/2"}]}}
        })))
        .mount(&server)
        .await;

    let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let found = repository(&server)
        .find_discussion("post", date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, "D_2");
}

#[tokio::test]
async fn test_creates_discussion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("createDiscussion"))
        .and(body_partial_json(json!({
            "variables": {
                "repositoryId": "R_1",
                "title": "Draft post",
                "body": "Body",
                "categoryId": "C_1"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "createDiscussion": {
                    "discussion": {"id": "id123", "url": "https://github.com/owner/repo/discussions/1"}
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publication = repository(&server)
        .create_discussion("R_1", "Draft post", "Body", "C_1")
        .await
        .unwrap();
    assert_eq!(publication.id, "id123");
}

#[tokio::test]
async fn test_uses_the_author_token_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .and(header("authorization", "Bearer author_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_id": "123"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut authors = std::collections::HashMap::new();
    authors.insert("author".to_string(), "author_token".to_string());
    let credentials = Credentials::new("TOKEN", "REPO_TOKEN", authors);
    let config = GitHubConfig {
        api_url: server.uri(),
        timeout_secs: Some(5),
    };

    let context = GitHubContext::from_credentials(&config, &credentials).unwrap();

    let repo = context.repository("owner", "repo", Some("author"));
    assert_eq!(repo.id().await.unwrap(), "123");
}

#[tokio::test]
async fn test_unknown_author_falls_back_to_default_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .and(header("authorization", "Bearer TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_id": "123"})))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::new("TOKEN", "REPO_TOKEN", Default::default());
    let config = GitHubConfig {
        api_url: server.uri(),
        timeout_secs: None,
    };

    let context = GitHubContext::from_credentials(&config, &credentials).unwrap();
    let repo = context.repository("owner", "repo", Some("stranger"));
    assert_eq!(repo.id().await.unwrap(), "123");
}
