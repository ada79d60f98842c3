use crate::config::RepoCoordinates;
use crate::core::path::ensure_dir;
use crate::core::{RelcopyError, RelcopyResult, ResultExt};
use crate::di::ReleaseTransport;
use crate::github::types::ReleaseAsset;
use crate::release::filter::AssetFilter;
use crate::release::Release;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Fetches a release and its assets from the source repository
///
/// Assets are streamed one at a time into the staging directory, under
/// their display name. An existing file of the same name is overwritten.
pub struct ReleaseDownloader {
    transport: Arc<dyn ReleaseTransport>,
    filter: AssetFilter,
}

impl ReleaseDownloader {
    pub fn new(transport: Arc<dyn ReleaseTransport>, filter: AssetFilter) -> Self {
        Self { transport, filter }
    }

    /// Download the release tagged `tag`.
    ///
    /// Returns the release notes and the names of the included assets, in
    /// source listing order. Without a staging directory only metadata is
    /// collected. Any failure aborts the whole download.
    pub async fn download(
        &self,
        repo: &RepoCoordinates,
        tag: &str,
        staging_dir: Option<&Path>,
    ) -> RelcopyResult<Release> {
        info!(%repo, tag, "fetching release");
        let source_release = self
            .transport
            .get_release_by_tag(&repo.owner, &repo.repo, tag)
            .await?;

        let assets = self
            .transport
            .list_release_assets(&repo.owner, &repo.repo, source_release.id)
            .await?;
        info!(tag, count = assets.len(), "release has assets");

        match staging_dir {
            Some(dir) => ensure_dir(dir)?,
            None => warn!(tag, "no staging directory set, asset content will not be downloaded"),
        }

        let mut names = Vec::new();
        for listed in &assets {
            let metadata = self
                .transport
                .get_release_asset(&repo.owner, &repo.repo, listed.id)
                .await
                .with_context(|| format!("asset {}", listed.id))?;

            let Some(name) = metadata.display_name() else {
                warn!(asset_id = listed.id, "skipping asset without a name");
                continue;
            };
            if is_unsafe_file_name(name) {
                warn!(asset_id = listed.id, name, "skipping asset whose name is not a plain file name");
                continue;
            }
            if !self.filter.matches(name) {
                info!(name, "ignoring asset (no filter pattern matches)");
                continue;
            }

            info!(name, "including asset");
            if let Some(dir) = staging_dir {
                self.stream_to_file(repo, &metadata, name, dir)
                    .await
                    .with_context(|| format!("asset {} ({})", metadata.id, name))?;
            }
            names.push(name.to_string());
        }

        info!(tag, included = names.len(), "release downloaded");
        Ok(Release {
            body: source_release.body.unwrap_or_default(),
            assets: names,
        })
    }

    async fn stream_to_file(
        &self,
        repo: &RepoCoordinates,
        asset: &ReleaseAsset,
        name: &str,
        dir: &Path,
    ) -> RelcopyResult<()> {
        let path = dir.join(name);
        let local_io = |source: std::io::Error| RelcopyError::LocalIo {
            path: path.clone(),
            source,
        };

        let mut stream = self
            .transport
            .get_release_asset_content(&repo.owner, &repo.repo, asset.id)
            .await?;
        let mut file = tokio::fs::File::create(&path).await.map_err(local_io)?;

        let pb = ProgressBar::new(asset.size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(format!("↓ {}", name));

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(local_io)?;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(local_io)?;
        pb.finish_and_clear();

        Ok(())
    }
}

/// Names that would escape or alias the staging directory
fn is_unsafe_file_name(name: &str) -> bool {
    name == "." || name == ".." || name.contains('/') || name.contains('\\')
}
