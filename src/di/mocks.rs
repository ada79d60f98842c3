//! Mock implementations of service traits for testing

use super::traits::{AssetStream, ReleaseTransport};
use crate::core::{RelcopyError, RelcopyResult};
use crate::github::types::{GitHubRelease, ReleaseAsset};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Mock release transport for testing
///
/// Keeps releases and asset bytes in memory, keyed by `owner/repo`, and
/// records every call so tests can assert on what was (not) requested.
/// Clones share state.
///
/// # Example
///
/// ```
/// use relcopy::di::mocks::MockReleaseTransport;
///
/// let source = MockReleaseTransport::new();
/// source.add_release("octo", "app", "v1.0.0", Some("notes"), "2023-01-01T00:00:00Z");
/// source.add_asset("octo", "app", "v1.0.0", Some("app.tar.gz"), b"bytes");
///
/// assert_eq!(source.asset_names("octo", "app", "v1.0.0"), vec!["app.tar.gz"]);
/// ```
#[derive(Clone, Default)]
pub struct MockReleaseTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    releases: HashMap<String, Vec<MockRelease>>,
    tag_failures: HashMap<String, (u16, String)>,
    broken_content: HashSet<u64>,
    calls: Vec<String>,
}

struct MockRelease {
    release: GitHubRelease,
    assets: Vec<(ReleaseAsset, Vec<u8>)>,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn repo_releases(&mut self, owner: &str, repo: &str) -> &mut Vec<MockRelease> {
        self.releases
            .entry(format!("{}/{}", owner, repo))
            .or_default()
    }

    fn find_release(&self, owner: &str, repo: &str, tag: &str) -> Option<&MockRelease> {
        self.releases
            .get(&format!("{}/{}", owner, repo))?
            .iter()
            .find(|r| r.release.tag_name == tag)
    }

    fn find_asset(&self, owner: &str, repo: &str, asset_id: u64) -> Option<&(ReleaseAsset, Vec<u8>)> {
        self.releases
            .get(&format!("{}/{}", owner, repo))?
            .iter()
            .flat_map(|r| r.assets.iter())
            .find(|(asset, _)| asset.id == asset_id)
    }
}

impl MockReleaseTransport {
    /// Create a new, empty mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a release and return its id
    pub fn add_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        body: Option<&str>,
        created_at: &str,
    ) -> u64 {
        let created_at: DateTime<Utc> = created_at.parse().unwrap();
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.repo_releases(owner, repo).push(MockRelease {
            release: GitHubRelease {
                id,
                tag_name: tag.to_string(),
                name: None,
                body: body.map(str::to_string),
                draft: false,
                prerelease: false,
                created_at,
            },
            assets: Vec::new(),
        });
        id
    }

    /// Attach an asset to an existing release and return the asset id
    pub fn add_asset(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        name: Option<&str>,
        content: &[u8],
    ) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let release = state
            .repo_releases(owner, repo)
            .iter_mut()
            .find(|r| r.release.tag_name == tag)
            .unwrap();
        release.assets.push((
            ReleaseAsset {
                id,
                name: name.map(str::to_string),
                size: content.len() as u64,
                content_type: Some("application/octet-stream".to_string()),
            },
            content.to_vec(),
        ));
        id
    }

    /// Make every lookup of `tag` fail with the given HTTP status
    pub fn fail_tag(&self, tag: &str, status: u16, message: &str) {
        self.state
            .lock()
            .unwrap()
            .tag_failures
            .insert(tag.to_string(), (status, message.to_string()));
    }

    /// Make the content stream of an asset break after its first chunk
    pub fn fail_asset_content(&self, asset_id: u64) {
        self.state.lock().unwrap().broken_content.insert(asset_id);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls whose description starts with `prefix`
    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// The stored release for a tag, if any
    pub fn release(&self, owner: &str, repo: &str, tag: &str) -> Option<GitHubRelease> {
        let state = self.state.lock().unwrap();
        state.find_release(owner, repo, tag).map(|r| r.release.clone())
    }

    /// Names of the assets attached to a release, in upload order
    pub fn asset_names(&self, owner: &str, repo: &str, tag: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .find_release(owner, repo, tag)
            .map(|r| {
                r.assets
                    .iter()
                    .filter_map(|(asset, _)| asset.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Bytes of a named asset of a release
    pub fn asset_content(&self, owner: &str, repo: &str, tag: &str, name: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .find_release(owner, repo, tag)?
            .assets
            .iter()
            .find(|(asset, _)| asset.name.as_deref() == Some(name))
            .map(|(_, content)| content.clone())
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl ReleaseTransport for MockReleaseTransport {
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> RelcopyResult<GitHubRelease> {
        self.record(format!("get_release_by_tag {}/{} {}", owner, repo, tag));
        let state = self.state.lock().unwrap();

        if let Some((status, message)) = state.tag_failures.get(tag) {
            return Err(if *status == 404 {
                RelcopyError::not_found(message.clone())
            } else {
                RelcopyError::Transport {
                    status: *status,
                    message: message.clone(),
                    body: Some(format!("{{\"message\":\"{}\"}}", message)),
                }
            });
        }

        state
            .find_release(owner, repo, tag)
            .map(|r| r.release.clone())
            .ok_or_else(|| RelcopyError::not_found(format!("release {} in {}/{}", tag, owner, repo)))
    }

    async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> RelcopyResult<Vec<ReleaseAsset>> {
        self.record(format!("list_release_assets {}", release_id));
        let state = self.state.lock().unwrap();
        state
            .releases
            .get(&format!("{}/{}", owner, repo))
            .and_then(|releases| releases.iter().find(|r| r.release.id == release_id))
            .map(|r| r.assets.iter().map(|(asset, _)| asset.clone()).collect())
            .ok_or_else(|| RelcopyError::not_found(format!("release id {}", release_id)))
    }

    async fn get_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        self.record(format!("get_release_asset {}", asset_id));
        let state = self.state.lock().unwrap();
        state
            .find_asset(owner, repo, asset_id)
            .map(|(asset, _)| asset.clone())
            .ok_or_else(|| RelcopyError::not_found(format!("asset {}", asset_id)))
    }

    async fn get_release_asset_content(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<AssetStream> {
        self.record(format!("get_release_asset_content {}", asset_id));
        let state = self.state.lock().unwrap();
        let (_, content) = state
            .find_asset(owner, repo, asset_id)
            .ok_or_else(|| RelcopyError::not_found(format!("asset {}", asset_id)))?;

        let mut chunks: Vec<RelcopyResult<Vec<u8>>> =
            content.chunks(4).map(|c| Ok(c.to_vec())).collect();
        if state.broken_content.contains(&asset_id) {
            chunks.truncate(1);
            chunks.push(Err(RelcopyError::Transport {
                status: 500,
                message: "connection reset while streaming".to_string(),
                body: None,
            }));
        }

        Ok(futures_util::stream::iter(chunks).boxed())
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        body: &str,
    ) -> RelcopyResult<GitHubRelease> {
        self.record(format!("create_release {}/{} {}", owner, repo, tag));
        let mut state = self.state.lock().unwrap();

        if state.find_release(owner, repo, tag).is_some() {
            return Err(RelcopyError::Transport {
                status: 422,
                message: "Validation Failed".to_string(),
                body: Some("{\"errors\":[{\"code\":\"already_exists\"}]}".to_string()),
            });
        }

        let id = state.next_id();
        let release = GitHubRelease {
            id,
            tag_name: tag.to_string(),
            name: None,
            body: Some(body.to_string()),
            draft: false,
            prerelease: false,
            created_at: Utc::now(),
        };
        state.repo_releases(owner, repo).push(MockRelease {
            release: release.clone(),
            assets: Vec::new(),
        });
        Ok(release)
    }

    async fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        mut file: File,
        size: u64,
    ) -> RelcopyResult<ReleaseAsset> {
        self.record(format!("upload_release_asset {} {}", release_id, name));
        let mut data = Vec::with_capacity(size as usize);
        file.read_to_end(&mut data).await.map_err(|source| RelcopyError::LocalIo {
            path: PathBuf::from(name),
            source,
        })?;

        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let release = state
            .repo_releases(owner, repo)
            .iter_mut()
            .find(|r| r.release.id == release_id)
            .ok_or_else(|| RelcopyError::not_found(format!("release id {}", release_id)))?;

        let asset = ReleaseAsset {
            id,
            name: Some(name.to_string()),
            size: data.len() as u64,
            content_type: Some("application/octet-stream".to_string()),
        };
        release.assets.push((asset.clone(), data));
        Ok(asset)
    }

    async fn list_releases(&self, owner: &str, repo: &str) -> RelcopyResult<Vec<GitHubRelease>> {
        self.record(format!("list_releases {}/{}", owner, repo));
        let state = self.state.lock().unwrap();
        Ok(state
            .releases
            .get(&format!("{}/{}", owner, repo))
            .map(|releases| releases.iter().map(|r| r.release.clone()).collect())
            .unwrap_or_default())
    }
}
