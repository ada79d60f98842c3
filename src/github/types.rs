//! GitHub API type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub release information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub created_at: DateTime<Utc>,
}

/// GitHub release asset
///
/// Used both for entries of a release's asset listing and for the
/// per-asset metadata lookup. `name` is optional so that an asset the API
/// reports without a usable name can be skipped instead of failing the copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl ReleaseAsset {
    /// The asset's display name, if it has a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Request body for creating a release
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease<'a> {
    pub tag_name: &'a str,
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserializes_with_missing_body() {
        let json = r#"{"id": 7, "tag_name": "v1.0.0", "created_at": "2023-01-01T00:00:00Z"}"#;
        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.id, 7);
        assert_eq!(release.body, None);
        assert!(!release.draft);
    }

    #[test]
    fn test_asset_display_name() {
        let json = r#"{"id": 1, "name": "app.tar.gz", "size": 10}"#;
        let asset: ReleaseAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.display_name(), Some("app.tar.gz"));

        let json = r#"{"id": 2, "name": "  "}"#;
        let asset: ReleaseAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.display_name(), None);

        let json = r#"{"id": 3, "name": null}"#;
        let asset: ReleaseAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.display_name(), None);
    }
}
