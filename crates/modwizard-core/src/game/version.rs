//! Tolerant parsing and numeric comparison of framework versions
//!
//! Version strings read from assembly metadata are frequently four-part
//! (`0.6.1.0`) or partially garbage, so parsing never fails: every segment
//! that cannot be read becomes zero.

use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// A `major.minor.patch` framework version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion(Version);

impl FrameworkVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parse a dotted version string, zero-filling missing or malformed segments
    pub fn parse(text: &str) -> Self {
        let cleaned = text.trim();
        let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
        let mut segments = cleaned
            .split('.')
            .map(|segment| segment.trim().parse::<u64>().unwrap_or(0));

        let major = segments.next().unwrap_or(0);
        let minor = segments.next().unwrap_or(0);
        let patch = segments.next().unwrap_or(0);
        Self::new(major, minor, patch)
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Three-way comparison over the numeric triple
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl Default for FrameworkVersion {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

impl From<&str> for FrameworkVersion {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}
