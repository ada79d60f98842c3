//! Service container for dependency injection

use super::traits::ReleaseTransport;
use crate::config::CopyConfig;
use crate::core::RelcopyResult;
use crate::github::GitHubClient;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds one transport per side of the copy. It uses `Arc<dyn Trait>` for
/// runtime polymorphism, so tests can inject mock transports.
#[derive(Clone)]
pub struct ServiceContainer {
    pub source: Arc<dyn ReleaseTransport>,
    pub destination: Arc<dyn ReleaseTransport>,
}

impl ServiceContainer {
    /// Create a service container backed by the GitHub API
    ///
    /// Builds one HTTP client per credential. No request is made here.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is not a valid header value or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &CopyConfig) -> RelcopyResult<Self> {
        Ok(Self {
            source: Arc::new(GitHubClient::new(&config.source)?),
            destination: Arc::new(GitHubClient::new(&config.destination)?),
        })
    }

    /// Create a service container with custom transport implementations
    pub fn with_providers(
        source: Arc<dyn ReleaseTransport>,
        destination: Arc<dyn ReleaseTransport>,
    ) -> Self {
        Self {
            source,
            destination,
        }
    }
}
