//! Content fetching for refsync.
//!
//! Resolves reference locators (relative/absolute paths or http(s) URLs),
//! reads them from disk or over HTTP, and coalesces concurrent fetches of
//! the same resolved locator into a single in-flight operation whose result
//! is shared by every waiter. Also implements the bulk-reference manifest
//! (`FileReferences.json`) that copies whole files.

pub mod auth;
pub mod error;
pub mod fetcher;
pub mod manifest;

pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use manifest::{MANIFEST_FILE_NAME, Manifest, apply_manifest, is_manifest};
