pub mod archive;
pub mod error;
pub mod install;
pub mod layout;
pub mod naming;
pub mod pipeline;
pub mod remote;

pub use archive::{ArchiveFormat, extract_archive};
pub use error::FetchError;
pub use install::{keymap_dir, sync_directory};
pub use layout::{DEFAULT_GEOMETRY, LATEST_REVISION, LayoutRef, Revision};
pub use naming::{SourceDirConvention, url_file_name};
pub use pipeline::{InstallPlan, InstallReport, InstallRequest, ScratchMode, plan, run};
pub use remote::{ArchiveDownloader, RevisionResolver, resolve_download_url};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
