//! End-to-end copies against a mock GitHub API

use super::common::relcopy_command;
use assert_cmd::assert::{Assert, OutputAssertExt};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn release_json(id: u64, tag: &str, body: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "tag_name": tag,
        "name": tag,
        "body": body,
        "draft": false,
        "prerelease": false,
        "created_at": created_at,
    })
}

fn asset_json(id: u64, name: &str, size: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "size": size,
        "content_type": "application/octet-stream",
    })
}

/// Mount a source release with assets `(id, name, content)`
async fn mount_source_release(
    server: &MockServer,
    release_id: u64,
    tag: &str,
    body: &str,
    assets: &[(u64, &str, &[u8])],
) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/app/releases/tags/{}", tag)))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_json(
            release_id,
            tag,
            body,
            "2023-01-01T00:00:00Z",
        )))
        .mount(server)
        .await;

    let listing: Vec<_> = assets
        .iter()
        .map(|(id, name, content)| asset_json(*id, name, content.len() as u64))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/app/releases/{}/assets", release_id)))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    for (id, name, content) in assets {
        let asset_path = format!("/repos/octo/app/releases/assets/{}", id);
        Mock::given(method("GET"))
            .and(path(asset_path.as_str()))
            .and(header("accept", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(asset_path.as_str()))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(asset_json(
                    *id,
                    name,
                    content.len() as u64,
                )),
            )
            .mount(server)
            .await;
    }
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run_relcopy(args: Vec<String>) -> Assert {
    tokio::task::spawn_blocking(move || relcopy_command().args(args).output().unwrap())
        .await
        .unwrap()
        .assert()
}

fn base_args(server: &MockServer, staging: &TempDir) -> Vec<String> {
    let api = server.uri();
    let uploads = format!("{}/uploads", server.uri());
    vec![
        "--source".into(),
        "octo/app".into(),
        "--dest".into(),
        "octo/mirror".into(),
        "--source-api-url".into(),
        api.clone(),
        "--dest-api-url".into(),
        api,
        "--dest-upload-url".into(),
        uploads,
        "--staging-dir".into(),
        staging.path().display().to_string(),
    ]
}

#[tokio::test(flavor = "multi_thread")]
async fn test_copy_single_release() {
    let server = MockServer::start().await;
    let staging = TempDir::new().unwrap();

    mount_source_release(
        &server,
        1,
        "v1.0.0",
        "Built by internal-ci",
        &[
            (10, "app.tar.gz", &b"tarball"[..]),
            (11, "checksums.txt", &b"sums"[..]),
        ],
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/mirror/releases"))
        .and(body_json(json!({"tag_name": "v1.0.0", "body": "Built by public-ci"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(release_json(
            2,
            "v1.0.0",
            "Built by public-ci",
            "2023-06-01T00:00:00Z",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/uploads/repos/octo/mirror/releases/2/assets"))
        .and(query_param("name", "app.tar.gz"))
        .respond_with(ResponseTemplate::new(201).set_body_json(asset_json(20, "app.tar.gz", 7)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/uploads/repos/octo/mirror/releases/2/assets"))
        .and(query_param("name", "checksums.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut args = base_args(&server, &staging);
    args.extend([
        "v1.0.0".to_string(),
        "--asset-filter".to_string(),
        r"\.tar\.gz$".to_string(),
        "--body-pattern".to_string(),
        "internal".to_string(),
        "--body-replacement".to_string(),
        "public".to_string(),
    ]);

    run_relcopy(args).await.success();

    assert_eq!(
        fs::read(staging.path().join("app.tar.gz")).unwrap(),
        b"tarball"
    );
    assert!(!staging.path().join("checksums.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_copy_all_skips_existing_and_stops_on_error() {
    let server = MockServer::start().await;
    let staging = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/repos/octo/app/releases"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            release_json(3, "v2.0.0", "two", "2023-02-01T00:00:00Z"),
            release_json(1, "v1.0.0", "one", "2023-01-01T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    // v1.0.0 is already mirrored
    Mock::given(method("GET"))
        .and(path("/repos/octo/mirror/releases/tags/v1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_json(
            9,
            "v1.0.0",
            "one",
            "2023-01-01T00:00:00Z",
        )))
        .mount(&server)
        .await;
    // The existence check for v2.0.0 hits an auth failure
    Mock::given(method("GET"))
        .and(path("/repos/octo/mirror/releases/tags/v2.0.0"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut args = base_args(&server, &staging);
    args.push("--all".to_string());

    run_relcopy(args)
        .await
        .failure()
        .stderr(predicate::str::contains("status: 401"))
        .stderr(predicate::str::contains("Bad credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_makes_no_writes() {
    let server = MockServer::start().await;
    let staging = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/repos/octo/app/releases"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            release_json(1, "v1.0.0", "one", "2023-01-01T00:00:00Z"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/mirror/releases/tags/v1.0.0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut args = base_args(&server, &staging);
    args.extend(["--all".to_string(), "--dry-run".to_string()]);

    run_relcopy(args)
        .await
        .success()
        .stderr(predicate::str::contains("would copy"));
}
