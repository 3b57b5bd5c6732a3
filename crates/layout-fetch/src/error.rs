/// Errors raised by the fetch-and-install pipeline.
///
/// Each variant corresponds to one pipeline phase so that the message shown
/// to the user identifies which step failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("remote service error: {0}")]
    RemoteService(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("archive extraction failed: {0}")]
    Archive(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
