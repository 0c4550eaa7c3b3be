//! Assets API.

use serde_json::json;

use stratus_core::{CursorPages, ListRequest};
use stratus_http::ApiClient;
use stratus_types::{Asset, AssetFilter, AssetPatch, Identity, Result};

use crate::resource::Resource;

const RESOURCE_PATH: &str = "/assets";

/// API for asset records.
#[derive(Debug, Clone)]
pub struct AssetsApi<'a> {
    resource: Resource<'a>,
}

impl<'a> AssetsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self {
            resource: Resource::new(client, RESOURCE_PATH),
        }
    }

    /// Overrides the per-request item limit for this handle.
    #[must_use]
    pub const fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.resource = self.resource.with_batch_limit(batch_limit);
        self
    }

    /// Retrieves a single asset by id.
    pub async fn retrieve(&self, id: i64) -> Result<Asset> {
        self.resource.retrieve(id).await
    }

    /// Retrieves assets by identity, preserving input order.
    pub async fn retrieve_multiple(&self, identities: &[Identity]) -> Result<Vec<Asset>> {
        self.resource.retrieve_multiple(identities).await
    }

    /// Lists assets matching the filter, autopaging up to `limit` items.
    pub async fn list(&self, filter: &AssetFilter, limit: Option<usize>) -> Result<Vec<Asset>> {
        let request = ListRequest::Get {
            params: filter.query_params(),
        };
        self.resource.list(request, limit).await
    }

    /// Returns a lazy page sequence over matching assets.
    pub fn iter(
        &self,
        filter: &AssetFilter,
        page_size: usize,
        limit: Option<usize>,
    ) -> Result<CursorPages<'a, Asset>> {
        let request = ListRequest::Get {
            params: filter.query_params(),
        };
        self.resource.pages(request, page_size, limit)
    }

    /// Creates a single asset, returning the created record.
    pub async fn create(&self, asset: Asset) -> Result<Asset> {
        Ok(self
            .resource
            .create(vec![asset])
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Creates assets, returning the created records in input order.
    pub async fn create_multiple(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        self.resource.create(assets).await
    }

    /// Applies a single partial update, returning the updated record.
    pub async fn update(&self, patch: AssetPatch) -> Result<Asset> {
        Ok(self
            .resource
            .update(vec![patch])
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Applies partial updates, returning the updated records in input
    /// order.
    pub async fn update_multiple(&self, patches: Vec<AssetPatch>) -> Result<Vec<Asset>> {
        self.resource.update(patches).await
    }

    /// Deletes assets by id. The assets endpoint takes a bare id list.
    pub async fn delete(&self, ids: &[i64]) -> Result<()> {
        self.resource.delete_ids(ids).await
    }

    /// Fuzzy-searches assets by name and description.
    pub async fn search(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Asset>> {
        let mut search = serde_json::Map::new();
        if let Some(name) = name {
            search.insert("name".to_string(), name.into());
        }
        if let Some(description) = description {
            search.insert("description".to_string(), description.into());
        }
        let body = json!({ "search": search, "limit": limit });
        self.resource.search(body).await
    }
}
