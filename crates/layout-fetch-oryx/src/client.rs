use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use layout_fetch::{
    ArchiveDownloader, FetchError, LayoutRef, Revision, RevisionResolver, url_file_name,
};
use tracing::debug;

use crate::query::{GraphQlRequest, GraphQlResponse};

/// GraphQL endpoint of the Oryx layout editor.
pub const DEFAULT_ENDPOINT: &str = "https://oryx.zsa.io/graphql";

/// Per-request timeout applied to the query and the download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for [`OryxClient`].
#[derive(Debug, Clone)]
pub struct OryxClientConfig {
    /// Overrides [`DEFAULT_ENDPOINT`] when set.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for OryxClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the Oryx layout service.
///
/// Resolves layout revisions over GraphQL and downloads the resulting
/// archives. One value serves both roles and is passed into the pipeline
/// explicitly.
pub struct OryxClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OryxClient {
    pub fn new(config: OryxClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("layout-fetch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::RemoteService(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RevisionResolver for OryxClient {
    async fn resolve(&self, layout: &LayoutRef) -> Result<Revision, FetchError> {
        if layout.hash_id.trim().is_empty() {
            return Err(FetchError::RemoteService("layout hash ID is empty".into()));
        }

        debug!(endpoint = %self.endpoint, "sending getLayout query");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest::get_layout(layout))
            .send()
            .await
            .map_err(|e| FetchError::RemoteService(format!("layout query failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::RemoteService(format!(
                "layout query returned HTTP {}",
                response.status()
            )));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| FetchError::RemoteService(format!("unexpected response: {e}")))?;

        body.into_revision()
    }
}

#[async_trait::async_trait]
impl ArchiveDownloader for OryxClient {
    async fn download(&self, url: &str, directory: &Path) -> Result<PathBuf, FetchError> {
        let file_name = url_file_name(url)
            .ok_or_else(|| FetchError::Download(format!("no file name in URL: {url}")))?;
        let path = directory.join(file_name);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Download(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Download(format!(
                "{url} returned HTTP {}",
                response.status()
            )));
        }

        debug!(path = %path.display(), "saving archive");

        let mut file = std::fs::File::create(&path)
            .map_err(|e| FetchError::Download(format!("cannot create {}: {e}", path.display())))?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Download(format!("failed to read body of {url}: {e}")))?
        {
            file.write_all(&chunk)
                .map_err(|e| FetchError::Download(format!("failed to write {}: {e}", path.display())))?;
            written += chunk.len() as u64;
        }

        file.sync_all()
            .map_err(|e| FetchError::Download(format!("failed to flush {}: {e}", path.display())))?;

        debug!(bytes = written, "archive saved");
        Ok(path)
    }
}
