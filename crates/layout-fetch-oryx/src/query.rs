use serde::{Deserialize, Serialize};

use layout_fetch::{FetchError, LayoutRef, Revision};

/// GraphQL document sent to the layout service.
pub const GET_LAYOUT_QUERY: &str = r#"query getLayout($hashId: String!, $revisionId: String!, $geometry: String) {
  Layout(hashId: $hashId, geometry: $geometry, revisionId: $revisionId) {
    ...LayoutData
    __typename
  }
}

fragment LayoutData on Layout {
  title
  revision {
    ...RevisionData
    __typename
  }
  lastRevisionCompiled
  isLatestRevision
  __typename
}

fragment RevisionData on Revision {
  createdAt
  hashId
  model
  title
  zipUrl
  qmkVersion
  qmkUptodate
  __typename
}
"#;

/// Request body for `POST /graphql`.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: LayoutVariables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutVariables<'a> {
    pub hash_id: &'a str,
    pub geometry: &'a str,
    pub revision_id: &'a str,
}

impl<'a> GraphQlRequest<'a> {
    pub fn get_layout(layout: &'a LayoutRef) -> Self {
        Self {
            query: GET_LAYOUT_QUERY,
            variables: LayoutVariables {
                hash_id: &layout.hash_id,
                geometry: &layout.geometry,
                revision_id: &layout.revision,
            },
        }
    }
}

/// Response envelope. Both halves may be present at once.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<LayoutData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LayoutData {
    #[serde(rename = "Layout")]
    pub layout: Option<LayoutNode>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutNode {
    pub title: Option<String>,
    pub revision: Option<RevisionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionNode {
    pub zip_url: Option<String>,
    pub hash_id: Option<String>,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub model: Option<String>,
    pub qmk_version: Option<String>,
    pub qmk_uptodate: Option<bool>,
}

impl GraphQlResponse {
    /// Pull the revision metadata out of the response, treating GraphQL
    /// errors and missing nodes as remote service failures.
    pub fn into_revision(self) -> Result<Revision, FetchError> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(FetchError::RemoteService(format!(
                "query returned errors: {}",
                messages.join("; ")
            )));
        }

        let layout = self
            .data
            .and_then(|d| d.layout)
            .ok_or_else(|| FetchError::RemoteService("layout not found".into()))?;

        let revision = layout
            .revision
            .ok_or_else(|| FetchError::RemoteService("layout has no revision".into()))?;

        let zip_url = revision
            .zip_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FetchError::RemoteService("revision has no zipUrl".into()))?;

        Ok(Revision {
            zip_url,
            hash_id: revision.hash_id,
            title: revision.title,
            layout_title: layout.title,
            created_at: revision.created_at,
            model: revision.model,
            qmk_version: revision.qmk_version,
            qmk_uptodate: revision.qmk_uptodate,
        })
    }
}
