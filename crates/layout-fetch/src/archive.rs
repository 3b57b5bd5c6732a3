use std::fs::File;
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::FetchError;

/// Container formats understood by [`extract_archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Pick a format from the archive's file name.
    ///
    /// The layout service ships zip files, so anything not recognisably a
    /// gzip'd tarball is treated as zip.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz
        } else {
            Self::Zip
        }
    }
}

/// Extract every entry of `archive_path` into `output_dir`, preserving
/// relative paths. Returns the number of files written.
pub fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<usize, FetchError> {
    let file = File::open(archive_path).map_err(|e| {
        FetchError::Archive(format!("cannot open {}: {e}", archive_path.display()))
    })?;

    match ArchiveFormat::from_path(archive_path) {
        ArchiveFormat::Zip => extract_zip(file, output_dir),
        ArchiveFormat::TarGz => extract_tar_gz(file, output_dir),
    }
}

fn extract_zip(file: File, output_dir: &Path) -> Result<usize, FetchError> {
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| FetchError::Archive(format!("not a valid zip archive: {e}")))?;

    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| FetchError::Archive(format!("failed to read zip entry {index}: {e}")))?;

        // Reject entries that would land outside the output directory.
        let relative = entry.enclosed_name().ok_or_else(|| {
            FetchError::Archive(format!("unsafe path in zip: {}", entry.name()))
        })?;
        let target = output_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| {
                FetchError::Archive(format!("cannot create {}: {e}", target.display()))
            })?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FetchError::Archive(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let mut out = File::create(&target).map_err(|e| {
            FetchError::Archive(format!("cannot create {}: {e}", target.display()))
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            FetchError::Archive(format!("failed to write {}: {e}", target.display()))
        })?;

        debug!(path = %target.display(), "extracted");
        written += 1;
    }

    Ok(written)
}

fn extract_tar_gz(file: File, output_dir: &Path) -> Result<usize, FetchError> {
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let entries = archive
        .entries()
        .map_err(|e| FetchError::Archive(format!("failed to read tar entries: {e}")))?;

    let mut written = 0;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| FetchError::Archive(format!("failed to read tar entry: {e}")))?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            let path = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            return Err(FetchError::Archive(format!("link entries are not allowed: {path}")));
        }
        let is_file = entry_type.is_file();

        // `unpack_in` refuses paths that escape `output_dir` and reports them
        // as `Ok(false)`.
        let unpacked = entry
            .unpack_in(output_dir)
            .map_err(|e| FetchError::Archive(format!("failed to unpack tar entry: {e}")))?;

        if !unpacked {
            let path = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            return Err(FetchError::Archive(format!("unsafe path in tar: {path}")));
        }

        if is_file {
            written += 1;
        }
    }

    Ok(written)
}
