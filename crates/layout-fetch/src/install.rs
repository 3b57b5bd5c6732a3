use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::FetchError;

/// Compute where a keymap lives inside a QMK firmware tree.
///
/// Layout: `repo_root/keyboards/<keyboard_folder>/keymaps/<keymap_folder>`.
/// `keyboard_folder` may span several segments (e.g. `ergodox_ez/shine`), but
/// neither folder may be absolute or climb out with `..`.
pub fn keymap_dir(
    repo_root: &Path,
    keyboard_folder: &str,
    keymap_folder: &str,
) -> Result<PathBuf, FetchError> {
    check_relative("keyboard folder", keyboard_folder)?;
    check_relative("keymap folder", keymap_folder)?;

    Ok(repo_root
        .join("keyboards")
        .join(keyboard_folder)
        .join("keymaps")
        .join(keymap_folder))
}

fn check_relative(what: &str, folder: &str) -> Result<(), FetchError> {
    if folder.trim().is_empty() {
        return Err(FetchError::Filesystem(format!("{what} must not be empty")));
    }

    let escapes = Path::new(folder).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(FetchError::Filesystem(format!(
            "{what} must be a relative path inside the firmware tree: {folder}"
        )));
    }

    Ok(())
}

/// Recursively copy `source` over `destination`.
///
/// Directories are created as needed and files with the same relative path
/// are overwritten. Files that only exist under `destination` are left alone,
/// so this is an overlay rather than a mirror. Symlinks in `source` are an
/// error. Returns the number of files copied.
pub fn sync_directory(source: &Path, destination: &Path) -> Result<usize, FetchError> {
    if !source.is_dir() {
        return Err(FetchError::Filesystem(format!(
            "source directory not found: {}",
            source.display()
        )));
    }

    copy_tree(source, destination)
}

fn copy_tree(source: &Path, destination: &Path) -> Result<usize, FetchError> {
    std::fs::create_dir_all(destination).map_err(|e| {
        FetchError::Filesystem(format!("cannot create {}: {e}", destination.display()))
    })?;

    let entries = std::fs::read_dir(source).map_err(|e| {
        FetchError::Filesystem(format!("cannot read {}: {e}", source.display()))
    })?;

    let mut copied = 0;

    for entry in entries {
        let entry = entry.map_err(|e| {
            FetchError::Filesystem(format!("cannot read {}: {e}", source.display()))
        })?;
        let from = entry.path();
        let to = destination.join(entry.file_name());

        // `DirEntry::file_type` does not follow symlinks.
        let file_type = entry.file_type().map_err(|e| {
            FetchError::Filesystem(format!("cannot stat {}: {e}", from.display()))
        })?;

        if file_type.is_symlink() {
            return Err(FetchError::Filesystem(format!(
                "refusing to install symlink {}",
                from.display()
            )));
        }

        if file_type.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| {
                FetchError::Filesystem(format!(
                    "cannot copy {} to {}: {e}",
                    from.display(),
                    to.display()
                ))
            })?;
            debug!(path = %to.display(), "installed");
            copied += 1;
        }
    }

    Ok(copied)
}
