//! GitHub integration for release copying
//!
//! This module provides functionality for interacting with the GitHub REST API to:
//! - Look up releases by tag and enumerate every release of a repository
//! - List and stream release assets
//! - Create releases and upload assets to them

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{GitHubRelease, NewRelease, ReleaseAsset};
