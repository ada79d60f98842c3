//! Release copying
//!
//! A copy runs Downloader -> body transform -> Uploader for each tag. The
//! only value passed between the stages is a [`Release`]; asset bytes live
//! in the staging directory, keyed by file name.

pub mod copier;
pub mod downloader;
pub mod filter;
pub mod ordering;
pub mod transform;
pub mod uploader;

pub use copier::{CopyReport, ReleaseCopier};
pub use downloader::ReleaseDownloader;
pub use filter::AssetFilter;
pub use ordering::order_releases;
pub use transform::{transform_body, BodyTransform};
pub use uploader::ReleaseUploader;

/// A release in transit between repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    /// Release notes; empty when the source has none
    pub body: String,
    /// File names of the staged assets, in source listing order
    pub assets: Vec<String>,
}
