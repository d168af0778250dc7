//! Utility functions shared across the crate.

mod version;

pub use version::{version_at_least, ServerVersion};
