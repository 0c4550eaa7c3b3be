//! File metadata records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{FieldUpdate, Identity};

/// Metadata of a file stored in the platform. Byte content is reached
/// through short-lived download links, not through this record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileMeta {
    /// Server-assigned id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Caller-assigned external id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// File name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The source system of this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// MIME type, e.g. `"application/pdf"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Custom, application-specific metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    /// Ids of assets this file relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_ids: Option<Vec<i64>>,
    /// Whether the file content has been uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<bool>,
    /// Upload completion time, milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<i64>,
    /// Creation time, milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    /// Last update time, milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<i64>,
}

/// Server-side filter for file listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFilter {
    /// Match files with this name.
    pub name: Option<String>,
    /// Match files with this MIME type.
    pub mime_type: Option<String>,
    /// Match files from this source system.
    pub source: Option<String>,
}

impl FileFilter {
    /// Renders the filter as a JSON `filter` object for POST listing.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut filter = serde_json::Map::new();
        if let Some(name) = &self.name {
            filter.insert("name".into(), name.clone().into());
        }
        if let Some(mime_type) = &self.mime_type {
            filter.insert("mimeType".into(), mime_type.clone().into());
        }
        if let Some(source) = &self.source {
            filter.insert("source".into(), source.clone().into());
        }
        serde_json::Value::Object(filter)
    }
}

/// A partial update of one file's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePatch {
    /// The file to update.
    #[serde(flatten)]
    pub identity: Identity,
    /// The fields to change.
    pub update: FileUpdate,
}

impl FilePatch {
    /// Starts an empty patch for the given file.
    pub fn new(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            update: FileUpdate::default(),
        }
    }

    /// Sets the file name.
    #[must_use]
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.update.name = Some(FieldUpdate::Set(name.into()));
        self
    }

    /// Sets the source system.
    #[must_use]
    pub fn set_source(mut self, source: impl Into<String>) -> Self {
        self.update.source = Some(FieldUpdate::Set(source.into()));
        self
    }

    /// Clears the source system.
    #[must_use]
    pub fn clear_source(mut self) -> Self {
        self.update.source = Some(FieldUpdate::SetNull);
        self
    }

    /// Replaces the related asset ids.
    #[must_use]
    pub fn set_asset_ids(mut self, asset_ids: Vec<i64>) -> Self {
        self.update.asset_ids = Some(FieldUpdate::Set(asset_ids));
        self
    }
}

/// Field updates of a [`FilePatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpdate {
    /// New file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldUpdate<String>>,
    /// New source system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<FieldUpdate<String>>,
    /// New metadata map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FieldUpdate<BTreeMap<String, String>>>,
    /// New related asset ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_ids: Option<FieldUpdate<Vec<i64>>>,
}

/// A short-lived download link for one file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    /// Numeric id of the file, when requested by id.
    #[serde(default)]
    pub id: Option<i64>,
    /// External id of the file, when requested by external id.
    #[serde(default)]
    pub external_id: Option<String>,
    /// The download URL.
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_meta_decode() {
        let meta: FileMeta = serde_json::from_str(
            r#"{"id":1,"name":"report.pdf","mimeType":"application/pdf","uploaded":true,"uploadedAt":0}"#,
        )
        .unwrap();
        assert_eq!(Some(1), meta.id);
        assert_eq!(Some("application/pdf".to_string()), meta.mime_type);
        assert_eq!(Some(true), meta.uploaded);
    }

    #[test]
    fn test_file_patch_wire_shape() {
        let patch = FilePatch::new(1).set_name("bla");
        assert_eq!(
            r#"{"id":1,"update":{"name":{"set":"bla"}}}"#,
            serde_json::to_string(&patch).unwrap()
        );
    }

    #[test]
    fn test_filter_json() {
        let filter = FileFilter {
            source: Some("bla".into()),
            ..FileFilter::default()
        };
        assert_eq!(serde_json::json!({"source": "bla"}), filter.to_json());
    }
}
