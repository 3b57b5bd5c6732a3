/// Geometry used when the caller does not name one.
pub const DEFAULT_GEOMETRY: &str = "ergodox-ez";

/// Revision selector meaning "most recent revision".
pub const LATEST_REVISION: &str = "latest";

/// Identifies a layout revision on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRef {
    pub hash_id: String,
    pub geometry: String,
    pub revision: String,
}

impl LayoutRef {
    /// Reference to the newest revision of `hash_id` for the given geometry.
    pub fn latest(hash_id: impl Into<String>, geometry: impl Into<String>) -> Self {
        Self {
            hash_id: hash_id.into(),
            geometry: geometry.into(),
            revision: LATEST_REVISION.to_owned(),
        }
    }
}

/// Revision metadata returned by the remote service.
///
/// Only `zip_url` drives the pipeline. The other fields are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    pub zip_url: String,
    pub hash_id: Option<String>,
    pub title: Option<String>,
    pub layout_title: Option<String>,
    pub created_at: Option<String>,
    pub model: Option<String>,
    pub qmk_version: Option<String>,
    pub qmk_uptodate: Option<bool>,
}

impl Revision {
    pub fn new(zip_url: impl Into<String>) -> Self {
        Self {
            zip_url: zip_url.into(),
            ..Self::default()
        }
    }
}
