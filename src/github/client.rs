//! GitHub API client implementation

use crate::config::RemoteConfig;
use crate::core::{RelcopyError, RelcopyResult};
use crate::di::traits::{AssetStream, ReleaseTransport};
use crate::github::types::{GitHubRelease, NewRelease, ReleaseAsset};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Body, Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs::File;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Page size requested from list endpoints (the API maximum).
const PER_PAGE: usize = 100;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest silence tolerated between two reads of a response body.
const READ_TIMEOUT: Duration = Duration::from_secs(120);

/// Whole-request deadline for JSON API calls. Asset transfers have none.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub API client
///
/// Bound to one token and one pair of API/upload endpoints, so a copy
/// between two repositories uses two clients.
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    upload_url: String,
    token: Option<String>,
    api_timeout: Duration,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limiter for GitHub API
struct RateLimiter {
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

impl GitHubClient {
    /// Create a new GitHub client for one side of a copy
    pub fn new(remote: &RemoteConfig) -> RelcopyResult<Self> {
        let token = remote.token.clone();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("relcopy"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(ref token) = token {
            let mut value = header::HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| RelcopyError::Config(format!("Invalid GitHub token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()
            .map_err(|e| RelcopyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let has_token = token.is_some();
        Ok(Self {
            http_client,
            api_url: remote.api_url.trim_end_matches('/').to_string(),
            upload_url: remote.upload_url.trim_end_matches('/').to_string(),
            token,
            api_timeout: API_TIMEOUT,
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(if has_token { 5000 } else { 60 }),
                reset_time: Mutex::new(SystemTime::now() + Duration::from_secs(3600)),
            }),
        })
    }

    /// Override the deadline applied to JSON API calls
    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /// Get a release by tag
    pub async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> RelcopyResult<GitHubRelease> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url,
            owner,
            repo,
            urlencoding::encode(tag)
        );
        self.api_get(&url).await
    }

    /// Get every asset attached to a release
    pub async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> RelcopyResult<Vec<ReleaseAsset>> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.api_url, owner, repo, release_id
        );
        self.api_get_paginated(&url).await
    }

    /// Get metadata for a single release asset
    pub async fn get_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        let url = format!(
            "{}/repos/{}/{}/releases/assets/{}",
            self.api_url, owner, repo, asset_id
        );
        self.api_get(&url).await
    }

    /// Stream the binary content of a release asset
    ///
    /// The API answers with a redirect to the storage backend; reqwest
    /// follows it and drops the authorization header on the cross-host hop.
    pub async fn get_release_asset_content(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<AssetStream> {
        let url = format!(
            "{}/repos/{}/{}/releases/assets/{}",
            self.api_url, owner, repo, asset_id
        );
        let request = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/octet-stream");
        let response = self.send(request, &url).await?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(RelcopyError::from))
            .boxed())
    }

    /// Create a release
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        body: &str,
    ) -> RelcopyResult<GitHubRelease> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, owner, repo);
        let request = self
            .http_client
            .post(&url)
            .timeout(self.api_timeout)
            .json(&NewRelease {
                tag_name: tag,
                body,
            });
        let response = self.send(request, &url).await?;
        parse_json(response).await
    }

    /// Upload a named asset to a release
    ///
    /// The file is streamed from disk; `size` becomes the Content-Length
    /// the upload endpoint requires.
    pub async fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        file: File,
        size: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets?name={}",
            self.upload_url,
            owner,
            repo,
            release_id,
            urlencoding::encode(name)
        );
        let request = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(file)));
        let response = self.send(request, &url).await?;
        parse_json(response).await
    }

    /// Get every release of a repository
    pub async fn list_releases(&self, owner: &str, repo: &str) -> RelcopyResult<Vec<GitHubRelease>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, owner, repo);
        self.api_get_paginated(&url).await
    }

    /// Send a request, keep the rate limit budget current and map
    /// non-success statuses to errors
    async fn send(&self, request: RequestBuilder, url: &str) -> RelcopyResult<Response> {
        self.check_rate_limit().await?;

        debug!(url, "GitHub API request");
        let response = request.send().await?;

        self.update_rate_limit(&response).await;

        if !response.status().is_success() {
            return Err(error_for_response(response, url).await);
        }

        Ok(response)
    }

    /// Make an API GET request and parse JSON response
    async fn api_get<T: DeserializeOwned>(&self, url: &str) -> RelcopyResult<T> {
        let request = self.http_client.get(url).timeout(self.api_timeout);
        let response = self.send(request, url).await?;
        parse_json(response).await
    }

    /// GET a list endpoint page by page until a short page comes back
    async fn api_get_paginated<T: DeserializeOwned>(&self, url: &str) -> RelcopyResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let page_url = format!("{}?per_page={}&page={}", url, PER_PAGE, page);
            let batch: Vec<T> = self.api_get(&page_url).await?;
            let count = batch.len();
            items.extend(batch);

            debug!(url, page, count, "fetched page");
            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Check if we're within rate limits
    async fn check_rate_limit(&self) -> RelcopyResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;

        if remaining == 0 {
            let now = SystemTime::now();
            if now < reset_time {
                let wait_duration = reset_time.duration_since(now).unwrap_or(Duration::ZERO);
                return Err(RelcopyError::Transport {
                    status: 403,
                    message: format!(
                        "GitHub API rate limit exceeded. Reset in {} seconds.{}",
                        wait_duration.as_secs(),
                        if self.token.is_none() {
                            " Consider passing a token to increase the rate limit to 5000/hour."
                        } else {
                            ""
                        }
                    ),
                    body: None,
                });
            }
        }

        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &Response) {
        if let Some(remaining) = header_u64(response, "x-ratelimit-remaining") {
            *self.rate_limiter.remaining.lock().await = remaining;
        }

        if let Some(reset) = header_u64(response, "x-ratelimit-reset") {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> RelcopyResult<T> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| RelcopyError::Transport {
        status,
        message: format!("Failed to parse GitHub API response: {}", e),
        body: Some(text),
    })
}

async fn error_for_response(response: Response, url: &str) -> RelcopyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = if body.is_empty() { None } else { Some(body) };

    if status == reqwest::StatusCode::NOT_FOUND {
        return RelcopyError::NotFound {
            what: url.to_string(),
            body,
        };
    }

    RelcopyError::Transport {
        status: status.as_u16(),
        message: format!("GitHub API error for {}", url),
        body,
    }
}

// Implement ReleaseTransport trait
#[async_trait]
impl ReleaseTransport for GitHubClient {
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> RelcopyResult<GitHubRelease> {
        Self::get_release_by_tag(self, owner, repo, tag).await
    }

    async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> RelcopyResult<Vec<ReleaseAsset>> {
        Self::list_release_assets(self, owner, repo, release_id).await
    }

    async fn get_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        Self::get_release_asset(self, owner, repo, asset_id).await
    }

    async fn get_release_asset_content(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<AssetStream> {
        Self::get_release_asset_content(self, owner, repo, asset_id).await
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        body: &str,
    ) -> RelcopyResult<GitHubRelease> {
        Self::create_release(self, owner, repo, tag, body).await
    }

    async fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        file: File,
        size: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        Self::upload_release_asset(self, owner, repo, release_id, name, file, size).await
    }

    async fn list_releases(&self, owner: &str, repo: &str) -> RelcopyResult<Vec<GitHubRelease>> {
        Self::list_releases(self, owner, repo).await
    }
}
