use crate::core::error::{RelcopyError, RelcopyResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release version (e.g., "alpha.1", "beta.2", "rc.1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<String>,
    /// Build metadata (e.g., "build.123")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_metadata: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build_metadata: None,
        }
    }

    /// Create a new version with pre-release metadata
    pub fn with_prerelease(major: u64, minor: u64, patch: u64, prerelease: String) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Some(prerelease),
            build_metadata: None,
        }
    }

    /// Parse a full semantic version ("1.2.3", "v1.2.3-rc.1", "1.2.3+build.5").
    ///
    /// All three numeric components are required; a single leading `v` is accepted.
    pub fn parse(s: &str) -> RelcopyResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('v').unwrap_or(s);
        let invalid = || RelcopyError::Config(format!("Invalid semantic version: {}", s));

        let (version_prerelease, build_metadata) = match s.split_once('+') {
            Some((head, build)) => (head, Some(build.to_string())),
            None => (s, None),
        };
        let (version_part, prerelease) = match version_prerelease.split_once('-') {
            Some((head, pre)) => (head, Some(pre.to_string())),
            None => (version_prerelease, None),
        };

        for ident in [&prerelease, &build_metadata].into_iter().flatten() {
            if !valid_identifiers(ident) {
                return Err(invalid());
            }
        }

        let parts: Vec<&str> = version_part.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            prerelease,
            build_metadata,
        })
    }

    /// Coerce a release tag into a version, loosely.
    ///
    /// Finds the first run of digits in the tag and reads up to three
    /// dot-separated numbers from there; missing minor/patch default to 0.
    /// When all three numbers are present and directly followed by a valid
    /// pre-release or build suffix, the suffix is kept. Returns `None` for
    /// tags without any digit.
    ///
    /// ```text
    /// "v1.10.0"          -> 1.10.0
    /// "release-2.1"      -> 2.1.0
    /// "v2.0.0-rc.1"      -> 2.0.0-rc.1
    /// "nightly"          -> None
    /// ```
    pub fn coerce(tag: &str) -> Option<Self> {
        let start = tag.find(|c: char| c.is_ascii_digit())?;
        let candidate = &tag[start..];

        let mut numbers: Vec<u64> = Vec::with_capacity(3);
        let mut rest = candidate;
        while numbers.len() < 3 {
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                break;
            }
            numbers.push(rest[..digits].parse().ok()?);
            rest = &rest[digits..];
            if numbers.len() < 3 {
                match rest.strip_prefix('.') {
                    Some(after) if after.starts_with(|c: char| c.is_ascii_digit()) => rest = after,
                    _ => break,
                }
            }
        }

        if numbers.len() == 3 && (rest.starts_with('-') || rest.starts_with('+')) {
            let token = candidate.split_whitespace().next().unwrap_or(candidate);
            if let Ok(full) = Self::parse(token) {
                return Some(full);
            }
        }

        Some(Self::new(
            numbers[0],
            numbers.get(1).copied().unwrap_or(0),
            numbers.get(2).copied().unwrap_or(0),
        ))
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }
}

fn valid_identifiers(s: &str) -> bool {
    s.split('.').all(|ident| {
        !ident.is_empty() && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

// Implement PartialEq and Eq manually to ignore build_metadata (SemVer 2.0.0 precedence)
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.prerelease == other.prerelease
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch)) {
            Ordering::Equal => {
                // Build metadata is ignored in version precedence
                match (&self.prerelease, &other.prerelease) {
                    (None, None) => Ordering::Equal,
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(a), Some(b)) => compare_prerelease_identifiers(a, b),
                }
            }
            other => other,
        }
    }
}

/// Compare pre-release identifiers by SemVer 2.0.0 precedence rules
fn compare_prerelease_identifiers(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for (a_part, b_part) in a_parts.iter().zip(b_parts.iter()) {
        let ordering = match (a_part.parse::<u64>(), b_part.parse::<u64>()) {
            (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
            (Ok(_), Err(_)) => Ordering::Less, // Numeric < alphanumeric
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a_part.cmp(b_part),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // If all parts are equal, longer pre-release is greater
    a_parts.len().cmp(&b_parts.len())
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(ref build) = self.build_metadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
