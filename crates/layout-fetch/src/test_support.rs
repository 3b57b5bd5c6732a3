use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{ArchiveDownloader, FetchError, LayoutRef, Revision, RevisionResolver, url_file_name};

/// In-memory stand-in for the layout service.
///
/// Revisions are keyed by hash ID; archives are keyed by URL and written to
/// disk verbatim when downloaded.
#[derive(Default)]
pub struct FakeRemote {
    revisions: HashMap<String, Revision>,
    archives: HashMap<String, Vec<u8>>,
    queries: Mutex<Vec<LayoutRef>>,
    download_dirs: Mutex<Vec<PathBuf>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_revision(&mut self, hash_id: impl Into<String>, revision: Revision) {
        self.revisions.insert(hash_id.into(), revision);
    }

    pub fn add_archive(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.archives.insert(url.into(), bytes);
    }

    /// Layout references passed to `resolve`, in call order.
    pub fn queries(&self) -> Vec<LayoutRef> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Directories archives were downloaded into, in call order.
    pub fn download_dirs(&self) -> Vec<PathBuf> {
        self.download_dirs
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RevisionResolver for FakeRemote {
    async fn resolve(&self, layout: &LayoutRef) -> Result<Revision, FetchError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(layout.clone());
        }

        self.revisions
            .get(&layout.hash_id)
            .cloned()
            .ok_or_else(|| FetchError::RemoteService(format!("layout not found: {}", layout.hash_id)))
    }
}

#[async_trait::async_trait]
impl ArchiveDownloader for FakeRemote {
    async fn download(&self, url: &str, directory: &Path) -> Result<PathBuf, FetchError> {
        if let Ok(mut dirs) = self.download_dirs.lock() {
            dirs.push(directory.to_path_buf());
        }

        let bytes = self
            .archives
            .get(url)
            .ok_or_else(|| FetchError::Download(format!("{url} returned HTTP 404 Not Found")))?;
        let name = url_file_name(url)
            .ok_or_else(|| FetchError::Download(format!("no file name in URL: {url}")))?;

        let path = directory.join(name);
        std::fs::write(&path, bytes).map_err(|e| FetchError::Download(e.to_string()))?;
        Ok(path)
    }
}
