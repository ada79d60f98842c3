use crate::config::{CopyConfig, CopyMode};
use crate::core::{RelcopyResult, ResultExt};
use crate::di::{ReleaseTransport, ServiceContainer};
use crate::release::downloader::ReleaseDownloader;
use crate::release::filter::AssetFilter;
use crate::release::ordering::order_releases;
use crate::release::transform::BodyTransform;
use crate::release::uploader::ReleaseUploader;
use std::sync::Arc;
use tracing::info;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Tags copied (or that would be copied, on a dry run), in processing order
    pub copied: Vec<String>,
    /// Tags already present at the destination
    pub skipped: Vec<String>,
    pub dry_run: bool,
}

/// Drives download, transform and upload for one tag or for every release
///
/// Work is strictly sequential. Failures stop the run and nothing copied
/// before the failure is rolled back.
pub struct ReleaseCopier {
    config: CopyConfig,
    source: Arc<dyn ReleaseTransport>,
    destination: Arc<dyn ReleaseTransport>,
    downloader: ReleaseDownloader,
    uploader: ReleaseUploader,
    transform: Option<BodyTransform>,
}

impl ReleaseCopier {
    pub fn new(config: CopyConfig, services: &ServiceContainer) -> Self {
        let filter = AssetFilter::new(config.asset_filter.as_deref());
        let transform = BodyTransform::new(
            config.body_pattern.as_deref(),
            config.body_replacement.as_deref(),
        );

        Self {
            downloader: ReleaseDownloader::new(Arc::clone(&services.source), filter),
            uploader: ReleaseUploader::new(Arc::clone(&services.destination)),
            source: Arc::clone(&services.source),
            destination: Arc::clone(&services.destination),
            transform,
            config,
        }
    }

    /// Run the configured copy.
    ///
    /// The mode is validated before any remote call is made.
    pub async fn run(&self) -> RelcopyResult<CopyReport> {
        let mode = self.config.mode()?;
        let mut report = CopyReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        match mode {
            CopyMode::Single(tag) => {
                if self.config.dry_run {
                    let repo = &self.config.source.repo;
                    self.source
                        .get_release_by_tag(&repo.owner, &repo.repo, &tag)
                        .await?;
                    info!(tag = %tag, "dry run: would copy release");
                } else {
                    self.copy_release(&tag).await?;
                }
                report.copied.push(tag);
            }
            CopyMode::All => self.copy_all(&mut report).await?,
        }

        Ok(report)
    }

    /// Copy one release: download, rewrite the body, upload.
    pub async fn copy_release(&self, tag: &str) -> RelcopyResult<()> {
        let staging_dir = self.config.staging_dir.as_deref();

        let mut release = self
            .downloader
            .download(&self.config.source.repo, tag, staging_dir)
            .await
            .with_context(|| format!("downloading release {}", tag))?;

        if let Some(transform) = &self.transform {
            release.body = transform.apply(&release.body);
        }

        self.uploader
            .upload(&self.config.destination.repo, tag, staging_dir, &release)
            .await
            .with_context(|| format!("uploading release {}", tag))?;

        info!(tag, assets = release.assets.len(), "release copied");
        Ok(())
    }

    async fn copy_all(&self, report: &mut CopyReport) -> RelcopyResult<()> {
        let source = &self.config.source.repo;
        let dest = &self.config.destination.repo;

        let releases = self
            .source
            .list_releases(&source.owner, &source.repo)
            .await?;
        info!(count = releases.len(), sort = %self.config.sort, "found source releases");

        for release in order_releases(releases, self.config.sort) {
            let tag = release.tag_name;

            // Only "not found" means the tag still needs copying
            match self
                .destination
                .get_release_by_tag(&dest.owner, &dest.repo, &tag)
                .await
            {
                Ok(_) => {
                    info!(tag = %tag, "release already exists at destination, skipping");
                    report.skipped.push(tag);
                    continue;
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            if self.config.dry_run {
                info!(tag = %tag, "dry run: would copy release");
            } else {
                info!(tag = %tag, "copying release");
                self.copy_release(&tag).await?;
            }
            report.copied.push(tag);
        }

        Ok(())
    }
}
