use std::path::PathBuf;

use async_trait::async_trait;
use genspec_core::{BaseSpecName, GenspecError, Result};
use genspec_genesis::GenesisSpec;
use tracing::{debug, info};

use crate::config::FetchConfig;

/// Anything that can hand out a base spec by name.
#[async_trait]
pub trait SpecSource: Send + Sync {
    async fn fetch(&self, name: BaseSpecName) -> Result<GenesisSpec>;

    /// Where `name` is fetched from, for logs and error messages.
    fn location(&self, name: BaseSpecName) -> String;
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

/// Fetches `<base_url>/spec/<name>.json` with a plain GET.
pub struct HttpSpecSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSpecSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenspecError::SpecFetch(format!("building HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// Fetch a spec from an arbitrary URL rather than a named template.
    pub async fn fetch_url(&self, url: &str) -> Result<GenesisSpec> {
        debug!(url, "fetching base spec");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GenspecError::SpecFetch(format!("GET {url}: {e}")))?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| GenspecError::SpecFetch(format!("reading {url}: {e}")))?;

        let spec = GenesisSpec::from_slice(&body)
            .map_err(|e| GenspecError::SpecFetch(format!("parsing {url}: {e}")))?;
        info!(url, bytes = body.len(), chain = spec.name().unwrap_or("<unnamed>"), "base spec fetched");
        Ok(spec)
    }
}

#[async_trait]
impl SpecSource for HttpSpecSource {
    async fn fetch(&self, name: BaseSpecName) -> Result<GenesisSpec> {
        self.fetch_url(&self.location(name)).await
    }

    fn location(&self, name: BaseSpecName) -> String {
        name.url_on(&self.base_url)
    }
}

// ── Local directory ──────────────────────────────────────────────────────────

/// Reads `<dir>/<name>.json` from disk.
pub struct FileSpecSource {
    dir: PathBuf,
}

impl FileSpecSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: BaseSpecName) -> PathBuf {
        self.dir.join(format!("{}.json", name.as_str()))
    }
}

#[async_trait]
impl SpecSource for FileSpecSource {
    async fn fetch(&self, name: BaseSpecName) -> Result<GenesisSpec> {
        let path = self.path_for(name);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| GenspecError::SpecFetch(format!("reading {}: {e}", path.display())))?;
        let spec = GenesisSpec::from_slice(&bytes)
            .map_err(|e| GenspecError::SpecFetch(format!("parsing {}: {e}", path.display())))?;
        info!(path = %path.display(), "base spec loaded");
        Ok(spec)
    }

    fn location(&self, name: BaseSpecName) -> String {
        self.path_for(name).display().to_string()
    }
}
