use std::path::{Path, PathBuf};

use crate::{FetchError, LayoutRef, Revision};

/// Resolves a layout reference to its revision metadata.
#[async_trait::async_trait]
pub trait RevisionResolver: Send + Sync {
    /// Look up the revision selected by `layout`.
    ///
    /// Fails with [`FetchError::RemoteService`] when the service cannot be
    /// reached, reports an error, or returns a response without an archive URL.
    async fn resolve(&self, layout: &LayoutRef) -> Result<Revision, FetchError>;
}

/// Retrieves a remote archive into a local directory.
#[async_trait::async_trait]
pub trait ArchiveDownloader: Send + Sync {
    /// Save the resource at `url` as `directory/<last URL segment>` and return
    /// the written path. Fails with [`FetchError::Download`].
    async fn download(&self, url: &str, directory: &Path) -> Result<PathBuf, FetchError>;
}

/// Resolve `layout` and return only its archive download URL.
pub async fn resolve_download_url(
    resolver: &(impl RevisionResolver + ?Sized),
    layout: &LayoutRef,
) -> Result<String, FetchError> {
    resolver.resolve(layout).await.map(|revision| revision.zip_url)
}
