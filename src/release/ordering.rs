//! Processing order for copy-all mode

use crate::config::SortOrder;
use crate::core::Version;
use crate::github::types::GitHubRelease;

/// Order source releases for copying, oldest first.
///
/// - [`SortOrder::Semver`]: tags that coerce to a version come first, in
///   ascending version order; the remaining tags follow in ascending
///   creation order, whatever their dates relative to the versioned ones.
/// - [`SortOrder::Date`]: every tag in ascending creation order.
///
/// Sorting is stable, so ties keep the source listing order.
pub fn order_releases(releases: Vec<GitHubRelease>, sort: SortOrder) -> Vec<GitHubRelease> {
    match sort {
        SortOrder::Date => {
            let mut releases = releases;
            releases.sort_by_key(|r| r.created_at);
            releases
        }
        SortOrder::Semver => {
            let mut versioned = Vec::new();
            let mut unversioned = Vec::new();
            for release in releases {
                match Version::coerce(&release.tag_name) {
                    Some(version) => versioned.push((version, release)),
                    None => unversioned.push(release),
                }
            }

            versioned.sort_by(|(a, _), (b, _)| a.cmp(b));
            unversioned.sort_by_key(|r| r.created_at);

            versioned
                .into_iter()
                .map(|(_, release)| release)
                .chain(unversioned)
                .collect()
        }
    }
}
