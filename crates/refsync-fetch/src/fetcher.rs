//! Locator resolution and coalesced content fetching.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::OnceCell;

use crate::auth;
use crate::error::{Error, Result};

/// A locator resolved to its canonical target.
#[derive(Debug, Clone)]
enum Resolved {
    Remote(Url),
    Local(PathBuf),
}

impl Resolved {
    /// Cache key. Case-insensitive: many files referencing the same resource
    /// with different casing still share one fetch.
    fn key(&self) -> String {
        match self {
            Self::Remote(url) => url.as_str().to_lowercase(),
            Self::Local(path) => path.to_string_lossy().to_lowercase(),
        }
    }
}

/// Resolves `locator`: absolute http(s) URLs are fetched remotely, anything
/// else is a path relative to the referencing file's directory.
fn resolve(referencing_file: &Path, locator: &str) -> Resolved {
    if let Ok(url) = Url::parse(locator) {
        if matches!(url.scheme(), "http" | "https") {
            return Resolved::Remote(url);
        }
    }

    let parent = match referencing_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let joined = parent.join(locator);
    // Canonicalize for stable cache keys; a nonexistent path keeps the
    // joined form and fails at read time instead.
    let resolved = dunce::canonicalize(&joined).unwrap_or(joined);
    Resolved::Local(resolved)
}

type Cache<T> = Mutex<HashMap<String, Arc<OnceCell<std::result::Result<T, Error>>>>>;

/// Fetches referenced content, coalescing concurrent requests for the same
/// resolved locator into one in-flight operation. Cached entries (successes
/// and failures alike) live for the whole run.
pub struct Fetcher {
    client: reqwest::Client,
    text_cache: Cache<String>,
    bytes_cache: Cache<Vec<u8>>,
    fetches: AtomicUsize,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("refsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            text_cache: Mutex::new(HashMap::new()),
            bytes_cache: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        })
    }

    /// Number of uncached fetch operations performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub async fn text(&self, referencing_file: &Path, locator: &str) -> Result<String> {
        let resolved = resolve(referencing_file, locator);
        let cell = cache_entry(&self.text_cache, resolved.key());
        cell.get_or_init(|| self.fetch_text_uncached(resolved))
            .await
            .clone()
    }

    pub async fn bytes(&self, referencing_file: &Path, locator: &str) -> Result<Vec<u8>> {
        let resolved = resolve(referencing_file, locator);
        let cell = cache_entry(&self.bytes_cache, resolved.key());
        cell.get_or_init(|| self.fetch_bytes_uncached(resolved))
            .await
            .clone()
    }

    async fn fetch_text_uncached(&self, resolved: Resolved) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match resolved {
            Resolved::Remote(url) => {
                let response = self.get(url.clone()).await?;
                response
                    .text()
                    .await
                    .map_err(|e| Error::request(&url, e))
            }
            Resolved::Local(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::read(path, e)),
        }
    }

    async fn fetch_bytes_uncached(&self, resolved: Resolved) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match resolved {
            Resolved::Remote(url) => {
                let response = self.get(url.clone()).await?;
                Ok(response
                    .bytes()
                    .await
                    .map_err(|e| Error::request(&url, e))?
                    .to_vec())
            }
            Resolved::Local(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| Error::read(path, e)),
        }
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        tracing::debug!(url = %url, "fetching remote reference");
        let mut request = self.client.get(url.clone());
        if auth::is_github_host(&url) {
            if let Some(token) = auth::github_token().await {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|e| Error::request(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn cache_entry<T>(cache: &Cache<T>, key: String) -> Arc<OnceCell<std::result::Result<T, Error>>> {
    let mut map = cache.lock().expect("fetch cache poisoned");
    map.entry(key).or_default().clone()
}

#[async_trait]
impl refsync_engine::ContentFetcher for Fetcher {
    async fn fetch_text(
        &self,
        referencing_file: &Path,
        locator: &str,
    ) -> refsync_engine::Result<String> {
        self.text(referencing_file, locator)
            .await
            .map_err(|e| refsync_engine::Error::fetch(locator, e))
    }

    async fn fetch_bytes(
        &self,
        referencing_file: &Path,
        locator: &str,
    ) -> refsync_engine::Result<Vec<u8>> {
        self.bytes(referencing_file, locator)
            .await
            .map_err(|e| refsync_engine::Error::fetch(locator, e))
    }
}
