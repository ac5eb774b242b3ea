//! HTTP-level tests for the catalog API, backed by in-memory collaborators.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use chrono::Utc;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use modhub_api::{AppState, build_app};
use modhub_cache::memory::MemoryCacheProvider;
use modhub_cache::{CacheDownloadLimiter, QueryCache};
use modhub_core::config::AppConfig;
use modhub_core::config::cache::MemoryCacheConfig;
use modhub_core::traits::cache::CacheProvider;
use modhub_database::{MemoryVersionStore, VersionStore};
use modhub_entity::version::{Stability, Version};
use modhub_service::{CatalogService, DownloadService};
use modhub_storage::LinkManager;
use modhub_storage::providers::LocalLinkProvider;

const MODERATOR_TOKEN: &str = "mod-secret";

/// Test application context
struct TestApp {
    router: Router,
    store: MemoryVersionStore,
}

/// Parsed response
struct TestResponse {
    status: StatusCode,
    headers: http::HeaderMap,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let mut config = AppConfig::from_toml(
            r#"
            [database]
            url = "postgres://modhub@localhost/modhub"
            "#,
        )
        .unwrap();
        config.server.moderator_token = Some(MODERATOR_TOKEN.to_string());

        let store = MemoryVersionStore::new();
        let versions: Arc<dyn VersionStore> = Arc::new(store.clone());
        let limiter_store: Arc<dyn CacheProvider> =
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1_000 }));
        let links = LinkManager::from_provider(Arc::new(
            LocalLinkProvider::new("https://cdn.example.com/mods").unwrap(),
        ));

        let catalog = CatalogService::new(
            Arc::clone(&versions),
            Arc::new(QueryCache::with_capacity(1_000, Duration::from_secs(300))),
            &config.catalog,
        );
        let downloads = DownloadService::new(
            catalog.clone(),
            versions,
            Arc::new(CacheDownloadLimiter::new(Arc::clone(&limiter_store))),
            Arc::new(links),
            &config.catalog,
        );

        let state = AppState {
            config: Arc::new(config),
            limiter_store,
            catalog,
            downloads,
        };

        Self {
            router: build_app(state),
            store,
        }
    }

    async fn seed(&self, id: &str, mod_id: &str, name: &str, approved: bool) {
        let now = Utc::now();
        self.store
            .seed(Version {
                id: id.into(),
                mod_id: mod_id.into(),
                version: name.into(),
                game_version: "1.20".into(),
                changelog: String::new(),
                downloads: 0,
                object_key: format!("{mod_id}/{name}.zip"),
                stability: Stability::Release,
                approved,
                denied: false,
                hash: None,
                size: Some(1024),
                metadata: None,
                created_at: now,
                updated_at: now,
            })
            .await;
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri, None, &[]).await
    }
}

fn create_body(version: &str) -> Value {
    json!({
        "version": version,
        "object_key": format!("P/{version}.zip"),
        "stability": "beta",
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_get_version_and_not_found() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;

    let response = app.get("/v1/version/a").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["version"], "1.0.0");
    assert!(response.body["data"].get("object_key").is_none());

    let response = app.get("/v1/version/missing").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_mod_scoped_lookups() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;

    assert_eq!(app.get("/v1/mod/m/version/a").await.status, StatusCode::OK);
    assert_eq!(
        app.get("/v1/mod/other/version/a").await.status,
        StatusCode::NOT_FOUND
    );

    let response = app.get("/v1/mod/m/version-name/1.0.0").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], "a");
}

#[tokio::test]
async fn test_create_duplicate_then_rate_limit() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/v1/mod/P/versions", Some(create_body("1.0.0")), &[])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["approved"], false);
    assert_eq!(response.body["data"]["stability"], "beta");

    let response = app
        .request("POST", "/v1/mod/P/versions", Some(create_body("1.0.0")), &[])
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "this mod already has a version with this name"
    );

    for patch in 1..=4 {
        let response = app
            .request(
                "POST",
                "/v1/mod/P/versions",
                Some(create_body(&format!("1.0.{patch}"))),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app
        .request("POST", "/v1/mod/P/versions", Some(create_body("1.0.5")), &[])
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["error"], "RATE_LIMITED");
    let retry_after: u64 = response.headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 23 * 3600 && retry_after <= 24 * 3600);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("please wait ")
    );
}

#[tokio::test]
async fn test_create_rejects_invalid_body() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/v1/mod/P/versions",
            Some(json!({ "version": "", "object_key": "P/x.zip" })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["details"]["version"].is_array());
}

#[tokio::test]
async fn test_unapproved_view_requires_moderator_token() {
    let app = TestApp::new();
    app.seed("pub", "m", "1.0.0", true).await;
    app.seed("queued", "m", "1.0.1", false).await;

    let response = app.get("/v1/mod/m/versions?unapproved=true").await;
    let ids: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["pub"]);

    let bearer = format!("Bearer {MODERATOR_TOKEN}");
    let response = app
        .request(
            "GET",
            "/v1/mod/m/versions?unapproved=true",
            None,
            &[("authorization", bearer.as_str())],
        )
        .await;
    let ids: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["queued"]);
}

#[tokio::test]
async fn test_list_with_filter_and_projection() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;
    app.seed("b", "m", "2.0.0", true).await;

    let response = app
        .get("/v1/versions?search=2.0.0&fields=id,version")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"],
        json!([{ "id": "b", "version": "2.0.0" }])
    );

    let response = app.get("/v1/versions/count?search=1.0.0").await;
    assert_eq!(response.body["data"]["count"], 1);

    let response = app.get("/v1/versions?fields=object_key").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_without_parameters_is_paginated() {
    let app = TestApp::new();
    for i in 0..25 {
        app.seed(&format!("v{i}"), "m", &format!("1.0.{i}"), true).await;
    }

    for uri in ["/v1/versions", "/v1/mod/m/versions"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"].as_array().unwrap().len(), 10, "{uri}");
    }

    let response = app.get("/v1/versions?limit=500").await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 25);

    let response = app.get("/v1/versions/count").await;
    assert_eq!(response.body["data"]["count"], 25);
}

#[tokio::test]
async fn test_by_ids_requires_every_id() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;
    app.seed("b", "m", "1.0.1", true).await;

    let response = app.get("/v1/versions/by-ids?ids=b,a").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["id"], "b");
    assert_eq!(response.body["data"][1]["id"], "a");

    let response = app.get("/v1/versions/by-ids?ids=a,zzz").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_versions() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;
    app.seed("n1", "n", "0.1.0", true).await;

    let response = app.get("/v1/mod/m/versions/latest").await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);

    let response = app.get("/v1/mods/latest-versions?ids=m,n").await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_download_redirects_and_counts_once() {
    let app = TestApp::new();
    app.seed("a", "m", "1.0.0", true).await;
    let client = [("x-forwarded-for", "203.0.113.9")];

    for _ in 0..2 {
        let response = app
            .request("GET", "/v1/version/a/download", None, &client)
            .await;
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(
            response.headers[header::LOCATION],
            "https://cdn.example.com/mods/m/1.0.0.zip"
        );
    }
    assert_eq!(app.store.downloads("a").await, Some(1));

    let response = app.get("/v1/version/missing/download").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dependencies_are_listed() {
    let app = TestApp::new();
    let body = json!({
        "version": "1.0.0",
        "object_key": "P/1.0.0.zip",
        "dependencies": [{ "mod_id": "lib", "condition": ">=1.0" }],
    });
    let created = app
        .request("POST", "/v1/mod/P/versions", Some(body), &[])
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let response = app.get(&format!("/v1/version/{id}/dependencies")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["mod_id"], "lib");
    assert_eq!(response.body["data"][0]["optional"], false);
}
