//! Dependency injection infrastructure for Relcopy
//!
//! The copy pipeline only talks to the hosting service through the
//! [`ReleaseTransport`] trait, so the HTTP client can be swapped for an
//! in-memory double in tests.
//!
//! # Example (Production)
//! ```no_run
//! use relcopy::config::PartialConfig;
//! use relcopy::di::ServiceContainer;
//!
//! # fn example(partial: PartialConfig) -> relcopy::RelcopyResult<()> {
//! let config = partial.into_config()?;
//! let container = ServiceContainer::new(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use relcopy::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let source = Arc::new(MockReleaseTransport::new());
//! let destination = Arc::new(MockReleaseTransport::new());
//!
//! let container = ServiceContainer::with_providers(source, destination);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{AssetStream, ReleaseTransport};
