//! Bulk-reference manifests: a JSON file mapping output file names to
//! locators, applied as whole-file copies (no block matching involved).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fetcher::Fetcher;

/// File name that triggers manifest processing instead of block scanning.
pub const MANIFEST_FILE_NAME: &str = "FileReferences.json";

/// Parsed manifest document:
/// `{"references": {"LICENSE.txt": {"ref": "./refs/LICENSE.txt"}}}`
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub references: HashMap<String, Option<ManifestEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "ref")]
    pub locator: Option<String>,
}

/// Whether `path` names a manifest file.
pub fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == MANIFEST_FILE_NAME)
}

/// Reads the manifest at `manifest_path` and copies each referenced resource
/// to its named output file in the manifest's directory. Entries without a
/// locator are skipped. Returns the number of files written.
pub async fn apply_manifest(manifest_path: &Path, fetcher: &Fetcher) -> Result<usize> {
    let bytes = tokio::fs::read(manifest_path)
        .await
        .map_err(|e| Error::read(manifest_path, e))?;
    let manifest: Manifest = serde_json::from_slice(&bytes).map_err(|e| Error::Manifest {
        path: manifest_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let mut written = 0;
    for (file_name, entry) in &manifest.references {
        let Some(locator) = entry.as_ref().and_then(|e| e.locator.as_deref()) else {
            continue;
        };
        tracing::info!(file = %file_name, locator = %locator, "updating file from manifest");
        let content = fetcher.bytes(manifest_path, locator).await?;
        let target = dir.join(file_name);
        refsync_fs::write_atomic(&target, &content).map_err(|e| Error::Write {
            path: target.clone(),
            message: e.to_string(),
        })?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_manifest_matches_exact_name() {
        assert!(is_manifest(Path::new("dir/FileReferences.json")));
        assert!(!is_manifest(Path::new("dir/filereferences.json")));
        assert!(!is_manifest(Path::new("dir/other.json")));
    }

    #[tokio::test]
    async fn test_apply_manifest_copies_local_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("refs")).unwrap();
        fs::write(dir.path().join("refs/LICENSE.txt"), "dummy").unwrap();
        let manifest_path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(
            &manifest_path,
            r#"{"references": {"LICENSE.txt": {"ref": "./refs/LICENSE.txt"}}}"#,
        )
        .unwrap();

        let written = apply_manifest(&manifest_path, &Fetcher::new().unwrap()).await.unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("LICENSE.txt")).unwrap(),
            "dummy"
        );
    }

    #[tokio::test]
    async fn test_apply_manifest_skips_null_and_empty_entries() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(
            &manifest_path,
            r#"{"references": {"a.txt": null, "b.txt": {}}}"#,
        )
        .unwrap();

        let written = apply_manifest(&manifest_path, &Fetcher::new().unwrap()).await.unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_apply_manifest_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&manifest_path, "not json").unwrap();

        let result = apply_manifest(&manifest_path, &Fetcher::new().unwrap()).await;
        assert!(matches!(result, Err(Error::Manifest { .. })));
    }
}
