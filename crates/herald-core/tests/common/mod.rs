//! Shared fixtures for publish pipeline tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use herald_core::Publisher;
use herald_github::{GitHubApi, GitHubContext, RestClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "TOKEN";
pub const REPO_TOKEN: &str = "REPO_TOKEN";
pub const AUTHOR_TOKEN: &str = "AUTHOR_TOKEN";

pub const DISCUSSION_URL: &str = "https://github.com/owner/repo/discussions/1";

pub const DRAFT: &str = "---
title: Draft post
repository: owner/repo
date: 2024-01-01T19:00
category: General
label: question
---
Body of draft post
";

fn client(server: &MockServer, token: &str) -> Arc<dyn GitHubApi> {
    Arc::new(RestClient::new(server.uri(), token, Some(Duration::from_secs(5))).unwrap())
}

/// Context with a default identity, a contents identity and one author
pub fn context(server: &MockServer) -> GitHubContext {
    GitHubContext::new(client(server, TOKEN), client(server, REPO_TOKEN))
        .with_author("author", client(server, AUTHOR_TOKEN))
}

pub fn publisher(server: &MockServer, dry_run: bool) -> Publisher {
    Publisher::new(context(server), dry_run)
}

pub fn write_draft(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// `General` → `C_1`
pub async fn mount_category(server: &MockServer, token: &str, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", bearer(token).as_str()))
        .and(body_string_contains("discussionCategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "repository": {
                    "discussionCategories": {
                        "nodes": [
                            {"id": "C_0", "name": "Announcements"},
                            {"id": "C_1", "name": "General"}
                        ]
                    }
                }
            }
        })))
        .expect(expect)
        .mount(server)
        .await;
}

/// `owner/repo` → `R_1`
pub async fn mount_repo(server: &MockServer, token: &str, expect: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .and(header("authorization", bearer(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_id": "R_1"})))
        .expect(expect)
        .mount(server)
        .await;
}

/// Any label name → `LA_<name>`
pub async fn mount_label(server: &MockServer, name: &str, expect: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/labels/{name}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"node_id": format!("LA_{name}")})),
        )
        .expect(expect)
        .mount(server)
        .await;
}

pub async fn mount_missing_label(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/labels/{name}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(server)
        .await;
}

pub async fn mount_create(server: &MockServer, token: &str, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", bearer(token).as_str()))
        .and(body_string_contains("createDiscussion"))
        .and(body_partial_json(json!({
            "variables": {"repositoryId": "R_1", "categoryId": "C_1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "createDiscussion": {
                    "discussion": {"id": "id123", "url": DISCUSSION_URL}
                }
            }
        })))
        .expect(expect)
        .mount(server)
        .await;
}

pub async fn mount_add_labels(server: &MockServer, label_ids: Value, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("addLabelsToLabelable"))
        .and(body_partial_json(json!({
            "variables": {"discussionId": "id123", "labelIds": label_ids}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"addLabelsToLabelable": {"labelable": {"number": 1}}}
        })))
        .expect(expect)
        .mount(server)
        .await;
}

/// Search answering with `nodes`
pub async fn mount_search(server: &MockServer, nodes: Value, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("search("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": nodes}}
        })))
        .expect(expect)
        .mount(server)
        .await;
}

/// Contents read for the repository path `file`
pub async fn mount_content(server: &MockServer, file: &str, expect: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/contents/{file}")))
        .and(header("authorization", bearer(REPO_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123"})))
        .expect(expect)
        .mount(server)
        .await;
}

/// Delete for the repository path `file`
pub async fn mount_delete(server: &MockServer, file: &str, expect: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/repos/owner/repo/contents/{file}")))
        .and(header("authorization", bearer(REPO_TOKEN).as_str()))
        .and(body_partial_json(json!({"sha": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"commit": {"sha": "def456"}})))
        .expect(expect)
        .mount(server)
        .await;
}
