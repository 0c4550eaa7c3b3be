//! Asset resource records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{FieldUpdate, Identity};

/// A physical asset, e.g. a plant or a piece of equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    /// Server-assigned id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Caller-assigned external id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Name of the asset, often referred to as tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ids of assets on the path from the root to this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<i64>>,
    /// Number of levels below the root node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
    /// Id of the parent asset, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Description of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Custom, application-specific metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    /// The source system of this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Id of the asset in the source system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Creation time, milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    /// Last update time, milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<i64>,
}

impl Asset {
    /// Creates an asset payload with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Server-side filter for asset listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    /// Match assets with this name.
    pub name: Option<String>,
    /// Include sub-assets up to this many levels below the matched path.
    pub depth: Option<i64>,
    /// Only return assets containing this description.
    pub description: Option<String>,
    /// Match assets from this source system.
    pub source: Option<String>,
}

impl AssetFilter {
    /// Renders the filter as URL query parameters.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(name) = &self.name {
            params.push(("name", name.clone()));
        }
        if let Some(depth) = self.depth {
            params.push(("depth", depth.to_string()));
        }
        if let Some(description) = &self.description {
            params.push(("description", description.clone()));
        }
        if let Some(source) = &self.source {
            params.push(("source", source.clone()));
        }
        params
    }
}

/// A partial update of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPatch {
    /// The asset to update.
    #[serde(flatten)]
    pub identity: Identity,
    /// The fields to change.
    pub update: AssetUpdate,
}

impl AssetPatch {
    /// Starts an empty patch for the given asset.
    pub fn new(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            update: AssetUpdate::default(),
        }
    }

    /// Sets the asset name.
    #[must_use]
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.update.name = Some(FieldUpdate::Set(name.into()));
        self
    }

    /// Sets the asset description.
    #[must_use]
    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.update.description = Some(FieldUpdate::Set(description.into()));
        self
    }

    /// Clears the asset description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.update.description = Some(FieldUpdate::SetNull);
        self
    }

    /// Sets the source system.
    #[must_use]
    pub fn set_source(mut self, source: impl Into<String>) -> Self {
        self.update.source = Some(FieldUpdate::Set(source.into()));
        self
    }

    /// Replaces the metadata map.
    #[must_use]
    pub fn set_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.update.metadata = Some(FieldUpdate::Set(metadata));
        self
    }
}

/// Field updates of an [`AssetPatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldUpdate<String>>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<FieldUpdate<String>>,
    /// New source system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<FieldUpdate<String>>,
    /// New metadata map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FieldUpdate<BTreeMap<String, String>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_skips_absent_fields() {
        let asset = Asset::named("pump-01");
        assert_eq!(r#"{"name":"pump-01"}"#, serde_json::to_string(&asset).unwrap());
    }

    #[test]
    fn test_patch_wire_shape() {
        let patch = AssetPatch::new(1).set_name("bla");
        assert_eq!(
            r#"{"id":1,"update":{"name":{"set":"bla"}}}"#,
            serde_json::to_string(&patch).unwrap()
        );
    }

    #[test]
    fn test_patch_set_null() {
        let patch = AssetPatch::new(Identity::external_id("a")).clear_description();
        assert_eq!(
            r#"{"externalId":"a","update":{"description":{"setNull":true}}}"#,
            serde_json::to_string(&patch).unwrap()
        );
    }

    #[test]
    fn test_filter_params() {
        let filter = AssetFilter {
            name: Some("pump".into()),
            depth: Some(2),
            ..AssetFilter::default()
        };
        assert_eq!(
            vec![("name", "pump".to_string()), ("depth", "2".to_string())],
            filter.query_params()
        );
    }
}
