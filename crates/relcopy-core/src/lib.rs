//! Core utilities shared by the Relcopy binary and library: the error
//! taxonomy, terminal error rendering, staging paths and tag versions.

pub mod core;

pub use core::error_help::{format_error_with_help, ErrorHelp};
pub use core::{RelcopyError, RelcopyResult, ResultExt, Version};
