/// Length of the `_<layout>_<revision>.zip` tail the remote service appends
/// to archive names, e.g. `lzxz0_AZjZE.zip`.
pub const ARCHIVE_SUFFIX_LEN: usize = 15;

/// Text appended after the tail is stripped.
pub const SOURCE_DIR_REPLACEMENT: &str = "source";

/// Final path segment of a URL, ignoring scheme, query string and fragment.
///
/// Returns `None` when the path ends in `/` or has no segment at all.
pub fn url_file_name(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    let path = match without_query.split_once("://") {
        Some((_scheme, rest)) => rest.split_once('/').map_or("", |(_host, path)| path),
        None => without_query,
    };

    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Some(segment),
        _ => None,
    }
}

/// Maps an archive URL to the name of the directory the archive unpacks to.
///
/// The remote service names its archives `<name>_<layout>_<revision>.zip` and
/// puts the keymap sources in `<name>_source/`. The mapping is purely textual,
/// so a change in the service's naming scheme yields a wrong name here; the
/// copy step reports that as a missing source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirConvention {
    /// Number of trailing characters stripped from the archive file name.
    pub suffix_len: usize,
    /// Text appended after stripping.
    pub replacement: String,
}

impl Default for SourceDirConvention {
    fn default() -> Self {
        Self {
            suffix_len: ARCHIVE_SUFFIX_LEN,
            replacement: SOURCE_DIR_REPLACEMENT.to_owned(),
        }
    }
}

impl SourceDirConvention {
    /// Derive the extracted source directory name from an archive URL.
    pub fn infer_source_dir(&self, url: &str) -> String {
        let file_name = url_file_name(url).unwrap_or("");
        let keep = file_name.chars().count().saturating_sub(self.suffix_len);
        let stem: String = file_name.chars().take(keep).collect();
        format!("{stem}{}", self.replacement)
    }
}
