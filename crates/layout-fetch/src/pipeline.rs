use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::{
    ArchiveDownloader, FetchError, LayoutRef, Revision, RevisionResolver, SourceDirConvention,
    extract_archive, keymap_dir, sync_directory,
};

/// Where the downloaded archive is unpacked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScratchMode {
    /// A fresh temporary directory, removed when the run ends (also on error).
    #[default]
    Temporary,
    /// A fixed directory, created if needed and left behind for inspection.
    Keep(PathBuf),
}

/// Everything a single fetch-and-install run needs.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub layout: LayoutRef,
    /// Root of the QMK firmware checkout.
    pub repo_root: PathBuf,
    /// Path under `keyboards/`, e.g. `ergodox_ez/shine`.
    pub keyboard_folder: String,
    /// Directory name under the keyboard's `keymaps/`.
    pub keymap_folder: String,
    pub scratch: ScratchMode,
    pub convention: SourceDirConvention,
}

impl InstallRequest {
    pub fn new(
        layout: LayoutRef,
        repo_root: impl Into<PathBuf>,
        keyboard_folder: impl Into<String>,
        keymap_folder: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            repo_root: repo_root.into(),
            keyboard_folder: keyboard_folder.into(),
            keymap_folder: keymap_folder.into(),
            scratch: ScratchMode::default(),
            convention: SourceDirConvention::default(),
        }
    }

    pub fn with_scratch(mut self, scratch: ScratchMode) -> Self {
        self.scratch = scratch;
        self
    }

    pub fn with_convention(mut self, convention: SourceDirConvention) -> Self {
        self.convention = convention;
        self
    }
}

/// The resolved but not yet executed parts of a run.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub revision: Revision,
    /// Directory inside the archive whose contents get installed.
    pub source_dir: String,
    pub destination: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub revision: Revision,
    pub destination: PathBuf,
    pub files_extracted: usize,
    pub files_installed: usize,
    /// Set when the scratch directory was kept on disk.
    pub scratch_kept: Option<PathBuf>,
}

/// Resolve the layout and work out what a run would install where, without
/// downloading anything or touching the filesystem.
pub async fn plan(
    resolver: &(impl RevisionResolver + ?Sized),
    request: &InstallRequest,
) -> Result<InstallPlan, FetchError> {
    let destination = keymap_dir(
        &request.repo_root,
        &request.keyboard_folder,
        &request.keymap_folder,
    )?;

    info!(
        hash_id = %request.layout.hash_id,
        geometry = %request.layout.geometry,
        revision = %request.layout.revision,
        "resolving layout"
    );
    let revision = resolver.resolve(&request.layout).await?;
    if revision.zip_url.is_empty() {
        return Err(FetchError::RemoteService(
            "revision has an empty download URL".into(),
        ));
    }

    info!(
        url = %revision.zip_url,
        title = revision.layout_title.as_deref().unwrap_or("-"),
        created_at = revision.created_at.as_deref().unwrap_or("-"),
        qmk_version = revision.qmk_version.as_deref().unwrap_or("-"),
        "resolved revision"
    );

    let source_dir = request.convention.infer_source_dir(&revision.zip_url);

    Ok(InstallPlan {
        revision,
        source_dir,
        destination,
    })
}

/// Fetch the layout's archive and install its source directory into the
/// firmware tree.
///
/// Steps run strictly in order and the first error aborts the run. The
/// destination is only written in the last step, so a failure earlier leaves
/// it untouched.
pub async fn run(
    resolver: &(impl RevisionResolver + ?Sized),
    downloader: &(impl ArchiveDownloader + ?Sized),
    request: &InstallRequest,
) -> Result<InstallReport, FetchError> {
    let InstallPlan {
        revision,
        source_dir,
        destination,
    } = plan(resolver, request).await?;

    let scratch = Scratch::create(&request.scratch)?;
    debug!(scratch = %scratch.path().display(), "scratch directory ready");

    info!(url = %revision.zip_url, "downloading archive");
    let archive = downloader
        .download(&revision.zip_url, scratch.path())
        .await?;

    info!(archive = %archive.display(), "extracting archive");
    let files_extracted = extract_archive(&archive, scratch.path())?;

    let source = scratch.path().join(&source_dir);
    info!(
        from = %source.display(),
        to = %destination.display(),
        "installing keymap"
    );
    let files_installed = sync_directory(&source, &destination)?;

    Ok(InstallReport {
        revision,
        destination,
        files_extracted,
        files_installed,
        scratch_kept: scratch.kept(),
    })
}

enum Scratch {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl Scratch {
    fn create(mode: &ScratchMode) -> Result<Self, FetchError> {
        match mode {
            ScratchMode::Temporary => tempfile::Builder::new()
                .prefix("layout-fetch-")
                .tempdir()
                .map(Self::Temporary)
                .map_err(|e| {
                    FetchError::Filesystem(format!("cannot create scratch directory: {e}"))
                }),
            ScratchMode::Keep(path) => {
                std::fs::create_dir_all(path).map_err(|e| {
                    FetchError::Filesystem(format!(
                        "cannot create scratch directory {}: {e}",
                        path.display()
                    ))
                })?;
                Ok(Self::Kept(path.clone()))
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Kept(path) => path,
        }
    }

    fn kept(&self) -> Option<PathBuf> {
        match self {
            Self::Temporary(_) => None,
            Self::Kept(path) => Some(path.clone()),
        }
    }
}
