//! Copy configuration
//!
//! A [`CopyConfig`] is assembled once at the process boundary from layered
//! [`PartialConfig`]s (YAML file, then environment/CLI) and handed by value
//! to the copier. Nothing below the binary reads the environment.

use crate::core::path::default_staging_dir;
use crate::core::{RelcopyError, RelcopyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com";

/// An `owner/repo` pair on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
}

impl RepoCoordinates {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepoCoordinates {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(format!("expected owner/repo, got '{}'", s)),
        }
    }
}

impl TryFrom<String> for RepoCoordinates {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoCoordinates> for String {
    fn from(value: RepoCoordinates) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Order in which copy-all mode processes source releases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Coercible tags by semantic version, then the rest by creation date
    #[default]
    Semver,
    /// Every tag by creation date
    Date,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "semver" => Ok(SortOrder::Semver),
            "date" => Ok(SortOrder::Date),
            other => Err(format!("unknown sort order '{}' (expected semver or date)", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Semver => write!(f, "semver"),
            SortOrder::Date => write!(f, "date"),
        }
    }
}

/// One side of a copy: where the repository lives and how to authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub repo: RepoCoordinates,
    pub token: Option<String>,
    pub api_url: String,
    pub upload_url: String,
}

/// What a single invocation copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyMode {
    /// Copy exactly one release
    Single(String),
    /// Copy every source release missing at the destination
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyConfig {
    pub source: RemoteConfig,
    pub destination: RemoteConfig,

    /// Where assets are staged between download and upload
    pub staging_dir: Option<PathBuf>,

    /// Release tag to copy (single mode)
    pub tag: Option<String>,

    /// Copy every release (batch mode)
    pub copy_all: bool,

    /// Asset names must match at least one of these patterns; `None` keeps all
    pub asset_filter: Option<Vec<String>>,

    /// Pattern applied to release notes before upload
    pub body_pattern: Option<String>,

    /// Replacement for `body_pattern`; matches are deleted when unset
    pub body_replacement: Option<String>,

    pub sort: SortOrder,

    /// Enumerate and check, but do not download or upload anything
    pub dry_run: bool,
}

impl CopyConfig {
    /// Resolve the copy mode, rejecting a tag combined with copy-all and
    /// the absence of both.
    pub fn mode(&self) -> RelcopyResult<CopyMode> {
        match (&self.tag, self.copy_all) {
            (Some(_), true) => Err(RelcopyError::Config(
                "A release tag and copy-all mode are mutually exclusive".to_string(),
            )),
            (None, false) => Err(RelcopyError::Config(
                "Either a release tag or copy-all mode is required".to_string(),
            )),
            (Some(tag), false) => Ok(CopyMode::Single(tag.clone())),
            (None, true) => Ok(CopyMode::All),
        }
    }
}

/// Connection settings for one side, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialRemote {
    pub repo: Option<RepoCoordinates>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
}

impl PartialRemote {
    fn merge(self, over: PartialRemote) -> PartialRemote {
        PartialRemote {
            repo: over.repo.or(self.repo),
            token: over.token.or(self.token),
            api_url: over.api_url.or(self.api_url),
            upload_url: over.upload_url.or(self.upload_url),
        }
    }

    fn resolve(self, side: &str, flag: &str) -> RelcopyResult<RemoteConfig> {
        let repo = self.repo.ok_or_else(|| {
            RelcopyError::Config(format!(
                "{} repository is not set (use {} owner/repo)",
                side, flag
            ))
        })?;

        Ok(RemoteConfig {
            repo,
            token: non_empty(self.token),
            api_url: non_empty(self.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            upload_url: non_empty(self.upload_url)
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string()),
        })
    }
}

/// Release-notes rewrite settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialBody {
    pub pattern: Option<String>,
    pub replacement: Option<String>,
}

/// One configuration layer (config file, or environment + CLI flags)
///
/// ```yaml
/// source:
///   repo: octo/app
///   token: ghp_xxx
/// destination:
///   repo: octo/app-mirror
/// asset_filter: ['\.tar\.gz$', '\.zip$']
/// body:
///   pattern: 'internal-only'
/// copy_all: true
/// sort: date
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub source: PartialRemote,
    #[serde(alias = "dest")]
    pub destination: PartialRemote,
    pub staging_dir: Option<PathBuf>,
    /// Only settable on the command line
    #[serde(skip)]
    pub tag: Option<String>,
    pub copy_all: Option<bool>,
    pub asset_filter: Option<Vec<String>>,
    pub body: PartialBody,
    pub sort: Option<SortOrder>,
    pub dry_run: Option<bool>,
}

impl PartialConfig {
    /// Load a configuration layer from a YAML file
    pub fn load(path: &Path) -> RelcopyResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| RelcopyError::LocalIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            RelcopyError::Config(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Layer `over` on top of `self`; set fields in `over` win
    pub fn merge(self, over: PartialConfig) -> PartialConfig {
        PartialConfig {
            source: self.source.merge(over.source),
            destination: self.destination.merge(over.destination),
            staging_dir: over.staging_dir.or(self.staging_dir),
            tag: over.tag.or(self.tag),
            copy_all: over.copy_all.or(self.copy_all),
            asset_filter: over.asset_filter.or(self.asset_filter),
            body: PartialBody {
                pattern: over.body.pattern.or(self.body.pattern),
                replacement: over.body.replacement.or(self.body.replacement),
            },
            sort: over.sort.or(self.sort),
            dry_run: over.dry_run.or(self.dry_run),
        }
    }

    /// Fill in defaults and produce the final configuration
    ///
    /// Mode exclusivity is not checked here; see [`CopyConfig::mode`].
    pub fn into_config(self) -> RelcopyResult<CopyConfig> {
        Ok(CopyConfig {
            source: self.source.resolve("Source", "--source")?,
            destination: self.destination.resolve("Destination", "--dest")?,
            staging_dir: Some(self.staging_dir.unwrap_or_else(default_staging_dir)),
            tag: non_empty(self.tag),
            copy_all: self.copy_all.unwrap_or(false),
            // An empty pattern list means "no filter"
            asset_filter: self.asset_filter.filter(|patterns| !patterns.is_empty()),
            body_pattern: non_empty(self.body.pattern),
            body_replacement: self.body.replacement,
            sort: self.sort.unwrap_or_default(),
            dry_run: self.dry_run.unwrap_or(false),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
