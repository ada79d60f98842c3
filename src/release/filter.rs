//! Asset inclusion filter

use regex::Regex;
use tracing::warn;

/// Decides which assets of a release are copied
///
/// Built from an optional list of regular expressions. An asset is kept
/// when no list was given, or when its name matches at least one pattern.
/// Patterns are unanchored: `linux` matches `app-linux-x64.tar.gz`.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    patterns: Option<Vec<Regex>>,
}

impl AssetFilter {
    /// Compile the patterns once. A pattern that fails to compile is logged
    /// and never matches; the remaining patterns still apply.
    pub fn new(patterns: Option<&[String]>) -> Self {
        let patterns = patterns.map(|patterns| {
            patterns
                .iter()
                .filter_map(|pattern| match Regex::new(pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "ignoring invalid asset filter pattern");
                        None
                    }
                })
                .collect()
        });
        Self { patterns }
    }

    /// A filter that keeps every asset
    pub fn include_all() -> Self {
        Self::default()
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.patterns {
            None => true,
            Some(patterns) => patterns.iter().any(|re| re.is_match(name)),
        }
    }
}
