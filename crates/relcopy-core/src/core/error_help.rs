use crate::core::error::RelcopyError;
use std::error::Error as _;

/// Suggestions shown next to an error at the process boundary.
pub trait ErrorHelp {
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for RelcopyError {
    fn help(&self) -> Option<&'static str> {
        match self.root() {
            RelcopyError::Config(_) => Some(
                "Pass either a release tag or --all (not both), and set --source and --dest as owner/repo.",
            ),
            RelcopyError::NotFound { .. } => {
                Some("Check that the tag exists and that the token can read the repository.")
            }
            RelcopyError::Transport { status: 401, .. } => {
                Some("The token was rejected. Check --source-token / --dest-token.")
            }
            RelcopyError::Transport { status: 403, .. } => Some(
                "Access denied or rate limit exhausted. Use a token with 'repo' scope or wait for the rate limit to reset.",
            ),
            RelcopyError::Transport { status: 422, .. } => {
                Some("The destination rejected the request; a release or asset with that name may already exist.")
            }
            RelcopyError::LocalIo { .. } => {
                Some("Check that the staging directory is writable (--staging-dir).")
            }
            _ => None,
        }
    }
}

/// Render an error for the terminal: message, cause chain, remote status,
/// remote response payload and a hint when one applies.
pub fn format_error_with_help(err: &RelcopyError) -> String {
    let mut out = format!("Error: {}", err);

    // Context and LocalIo already render their inner error inline
    let mut source = err.root().source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(&format!("\n  caused by: {}", text));
        }
        source = cause.source();
    }

    if let Some(status) = err.status() {
        out.push_str(&format!("\n  status: {}", status));
    }
    if let Some(body) = err.response_body() {
        if !body.is_empty() {
            out.push_str(&format!("\n  response: {}", body));
        }
    }
    if let Some(help) = err.help() {
        out.push_str(&format!("\n\nhelp: {}", help));
    }

    out
}
