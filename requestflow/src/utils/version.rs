//! Component-wise version string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Checks whether a dot-separated version string is at least `minimum`.
///
/// Components are compared numerically left to right. Missing or malformed
/// components compare as zero, so `"1.9"` is below `[2, 0]` and `"2"` meets
/// `[2, 0, 0]`. Never fails.
#[must_use]
pub fn version_at_least(version: &str, minimum: &[u32]) -> bool {
    let mut parts = version.split('.');
    for &min_component in minimum {
        let component = parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(0);
        if component > min_component {
            return true;
        }
        if component < min_component {
            return false;
        }
    }
    true
}

/// The running host server's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
    /// Patch version component.
    pub patch: u32,
}

impl ServerVersion {
    /// Creates a server version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Checks whether this version is at least the given one.
    #[must_use]
    pub const fn at_least(self, major: u32, minor: u32, patch: u32) -> bool {
        let this = (self.major, self.minor, self.patch);
        let that = (major, minor, patch);
        this.0 > that.0
            || (this.0 == that.0
                && (this.1 > that.1 || (this.1 == that.1 && this.2 >= that.2)))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
