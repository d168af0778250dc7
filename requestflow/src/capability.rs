//! Capability negotiation against a configured platform/product support table.

use crate::utils::version_at_least;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wildcard key matching any platform or product.
pub const WILDCARD: &str = "*";

/// A support table mapping platforms to products and their minimum client
/// versions.
///
/// Both levels accept a `"*"` wildcard entry. A wildcard platform entry
/// authorizes every client regardless of product or version; a wildcard
/// product entry supplies the minimum version for products without an exact
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMatrix {
    platforms: HashMap<String, HashMap<String, Vec<u32>>>,
}

impl CapabilityMatrix {
    /// Creates an empty matrix, which authorizes no platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum version entry for a platform/product pair.
    #[must_use]
    pub fn with_entry(
        mut self,
        platform: impl Into<String>,
        product: impl Into<String>,
        min_version: impl Into<Vec<u32>>,
    ) -> Self {
        self.platforms
            .entry(platform.into())
            .or_default()
            .insert(product.into(), min_version.into());
        self
    }

    /// Adds a wildcard platform entry authorizing every client.
    #[must_use]
    pub fn with_any_platform(mut self) -> Self {
        self.platforms.entry(WILDCARD.into()).or_default();
        self
    }

    /// Returns true if the matrix has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Evaluates platform-level support for a client.
    ///
    /// Wildcard precedence follows the negotiation rules exactly: a wildcard
    /// platform entry or an absent platform header authorizes immediately; an
    /// exact platform match consults its product table, falling back to the
    /// wildcard product entry, and compares the client version against the
    /// configured minimum. Anything else is unsupported. Never fails.
    #[must_use]
    pub fn platform_supported(
        &self,
        platform: Option<&str>,
        product: Option<&str>,
        client_version: &str,
    ) -> bool {
        if self.platforms.contains_key(WILDCARD) || platform.is_none() {
            return true;
        }

        let Some(products) = platform.and_then(|p| self.platforms.get(p)) else {
            return false;
        };

        let product_key = match product {
            Some(p) if products.contains_key(p) => p,
            _ => WILDCARD,
        };

        products
            .get(product_key)
            .is_some_and(|min_version| version_at_least(client_version, min_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matrix_rejects_known_platform() {
        let matrix = CapabilityMatrix::new();
        assert!(!matrix.platform_supported(Some("roku"), Some("Player"), "9.9"));
    }

    #[test]
    fn test_wildcard_platform_authorizes_everyone() {
        let matrix = CapabilityMatrix::new().with_any_platform();
        assert!(matrix.platform_supported(Some("unknown"), None, "0"));
        assert!(matrix.platform_supported(None, None, "0"));
    }

    #[test]
    fn test_absent_platform_authorizes() {
        let matrix = CapabilityMatrix::new().with_entry("roku", "Player", [2, 0]);
        assert!(matrix.platform_supported(None, Some("Player"), "0"));
    }

    #[test]
    fn test_exact_platform_and_product_version_gate() {
        let matrix = CapabilityMatrix::new().with_entry("roku", "Player", [2, 0]);
        assert!(matrix.platform_supported(Some("roku"), Some("Player"), "2.0"));
        assert!(matrix.platform_supported(Some("roku"), Some("Player"), "2.1"));
        assert!(!matrix.platform_supported(Some("roku"), Some("Player"), "1.9"));
    }

    #[test]
    fn test_product_falls_back_to_wildcard_entry() {
        let matrix = CapabilityMatrix::new().with_entry("roku", WILDCARD, [1, 0]);
        assert!(matrix.platform_supported(Some("roku"), Some("Other"), "1.0"));
        assert!(!matrix.platform_supported(Some("roku"), Some("Other"), "0.9"));
    }

    #[test]
    fn test_missing_product_uses_wildcard_entry() {
        let matrix = CapabilityMatrix::new().with_entry("roku", WILDCARD, [1, 0]);
        assert!(matrix.platform_supported(Some("roku"), None, "1.0"));
    }

    #[test]
    fn test_platform_without_matching_product_is_unsupported() {
        let matrix = CapabilityMatrix::new().with_entry("roku", "Player", [2, 0]);
        assert!(!matrix.platform_supported(Some("roku"), Some("Other"), "9.9"));
    }

    #[test]
    fn test_unlisted_platform_is_unsupported() {
        let matrix = CapabilityMatrix::new().with_entry("roku", "Player", [2, 0]);
        assert!(!matrix.platform_supported(Some("tv"), Some("Player"), "9.9"));
    }

    #[test]
    fn test_exact_product_beats_wildcard() {
        let matrix = CapabilityMatrix::new()
            .with_entry("roku", "Player", [3, 0])
            .with_entry("roku", WILDCARD, [1, 0]);
        // The exact entry's stricter minimum applies to its product.
        assert!(!matrix.platform_supported(Some("roku"), Some("Player"), "2.0"));
        assert!(matrix.platform_supported(Some("roku"), Some("Other"), "2.0"));
    }
}
