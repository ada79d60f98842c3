//! Release notes rewriting

use regex::Regex;
use tracing::warn;

/// A compiled body rewrite: every match of `pattern` is replaced with
/// `replacement`, or deleted when no replacement was configured.
///
/// The replacement uses regex expansion syntax. `$1` and `${name}` insert
/// capture groups, `$$` inserts a literal `$`, and a reference to a group
/// the pattern does not have expands to nothing.
#[derive(Debug, Clone)]
pub struct BodyTransform {
    pattern: Regex,
    replacement: String,
}

impl BodyTransform {
    /// Compile a rewrite. Returns `None` (and logs) when no pattern is set
    /// or the pattern is not a valid regular expression.
    pub fn new(pattern: Option<&str>, replacement: Option<&str>) -> Option<Self> {
        let pattern = pattern?;
        match Regex::new(pattern) {
            Ok(pattern) => Some(Self {
                pattern,
                replacement: replacement.unwrap_or_default().to_string(),
            }),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "invalid body pattern, leaving release notes unchanged");
                None
            }
        }
    }

    /// Apply to every non-overlapping match.
    pub fn apply(&self, body: &str) -> String {
        self.pattern
            .replace_all(body, self.replacement.as_str())
            .into_owned()
    }
}

/// Rewrite `body` in one step; see [`BodyTransform`].
pub fn transform_body(body: &str, pattern: Option<&str>, replacement: Option<&str>) -> String {
    match BodyTransform::new(pattern, replacement) {
        Some(transform) => transform.apply(body),
        None => body.to_string(),
    }
}
