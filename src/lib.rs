//! Relcopy: copy GitHub releases between repositories
//!
//! This crate provides the Relcopy library: the release copy pipeline
//! (download, body rewrite, upload), the copy-all batch mode, and the
//! GitHub transport it runs over. Errors and version handling come from
//! `relcopy-core`.

pub use relcopy_core::{format_error_with_help, ErrorHelp, RelcopyError, RelcopyResult, Version};

/// Core module re-exported from relcopy-core.
pub mod core {
    pub use relcopy_core::core::*;
}

/// Copy configuration.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub REST transport.
pub mod github;

/// Release download, rewrite, upload and batch orchestration.
pub mod release;
