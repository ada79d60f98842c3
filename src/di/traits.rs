//! Trait definitions for dependency injection

use crate::core::RelcopyResult;
use crate::github::types::{GitHubRelease, ReleaseAsset};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use tokio::fs::File;

/// Chunks of an asset's binary content, in order.
pub type AssetStream = BoxStream<'static, RelcopyResult<Vec<u8>>>;

/// Trait for the hosting API that releases are copied from and to
///
/// One instance is bound to one credential (one side of a copy).
/// Errors must classify a missing resource as `RelcopyError::NotFound`
/// so that callers can tell "absent" apart from every other failure.
#[async_trait]
pub trait ReleaseTransport: Send + Sync {
    /// Look up a release by its tag
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> RelcopyResult<GitHubRelease>;

    /// List every asset attached to a release, in listing order
    async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> RelcopyResult<Vec<ReleaseAsset>>;

    /// Fetch the metadata of a single asset
    async fn get_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<ReleaseAsset>;

    /// Stream the binary content of a single asset
    async fn get_release_asset_content(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> RelcopyResult<AssetStream>;

    /// Create a release for `tag` with the given notes
    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        body: &str,
    ) -> RelcopyResult<GitHubRelease>;

    /// Attach a named binary asset to an existing release
    async fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        file: File,
        size: u64,
    ) -> RelcopyResult<ReleaseAsset>;

    /// List every release of a repository, across all pages
    async fn list_releases(&self, owner: &str, repo: &str) -> RelcopyResult<Vec<GitHubRelease>>;
}
