use crate::config::RepoCoordinates;
use crate::core::{RelcopyError, RelcopyResult, ResultExt};
use crate::di::ReleaseTransport;
use crate::release::Release;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tracing::{info, warn};

/// Creates a release in the destination repository and attaches staged assets
pub struct ReleaseUploader {
    transport: Arc<dyn ReleaseTransport>,
}

impl ReleaseUploader {
    pub fn new(transport: Arc<dyn ReleaseTransport>) -> Self {
        Self { transport }
    }

    /// Create the release `tag` with `release.body` and upload each asset
    /// named in `release.assets` from `staging_dir`, in order.
    ///
    /// The first failure stops the upload. Whatever was already created at
    /// the destination stays there.
    pub async fn upload(
        &self,
        repo: &RepoCoordinates,
        tag: &str,
        staging_dir: Option<&Path>,
        release: &Release,
    ) -> RelcopyResult<()> {
        info!(%repo, tag, "creating release");
        let created = self
            .transport
            .create_release(&repo.owner, &repo.repo, tag, &release.body)
            .await?;

        let Some(dir) = staging_dir else {
            if !release.assets.is_empty() {
                warn!(
                    tag,
                    count = release.assets.len(),
                    "no staging directory set, skipping asset uploads"
                );
            }
            return Ok(());
        };

        for name in &release.assets {
            let path = dir.join(name);
            let local_io = |source| RelcopyError::LocalIo {
                path: path.clone(),
                source,
            };
            let file = File::open(&path).await.map_err(local_io)?;
            let size = file.metadata().await.map_err(local_io)?.len();

            info!(name, bytes = size, "uploading asset");
            self.transport
                .upload_release_asset(&repo.owner, &repo.repo, created.id, name, file, size)
                .await
                .with_context(|| format!("uploading asset {}", name))?;
        }

        info!(tag, uploaded = release.assets.len(), "release uploaded");
        Ok(())
    }
}
