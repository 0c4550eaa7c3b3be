//! Generic bulk CRUD operations shared by every resource API.
//!
//! All operations speak the platform's standard wire shape: requests wrap
//! payloads under `items`, responses under `data.items`. Collections larger
//! than the per-request item limit are split into batches and dispatched
//! through the bounded worker pool; batch results are concatenated in input
//! order, so callers never observe the partitioning.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use stratus_core::{CursorPages, ListRequest, chunk_items, execute_concurrently};
use stratus_http::{ApiClient, envelope};
use stratus_types::{Identity, Result, StratusError};

/// Per-request item limit of the bulk CRUD endpoints.
pub const CRUD_LIMIT: usize = 1_000;

/// Generic operations over one resource endpoint, e.g. `/assets`.
#[derive(Debug, Clone)]
pub struct Resource<'a> {
    client: &'a ApiClient,
    path: &'static str,
    batch_limit: usize,
}

impl<'a> Resource<'a> {
    /// Creates a handle for the resource rooted at `path`.
    #[must_use]
    pub const fn new(client: &'a ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            batch_limit: CRUD_LIMIT,
        }
    }

    /// Overrides the per-request item limit. Mainly for tests exercising
    /// the batching paths with small payloads.
    #[must_use]
    pub const fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    const fn max_workers(&self) -> usize {
        self.client.config().max_workers
    }

    /// Retrieves a single resource by numeric id via `GET {path}/{id}`.
    pub async fn retrieve<T: DeserializeOwned>(&self, id: i64) -> Result<T> {
        let value = self.client.get(&format!("{}/{id}", self.path), &[]).await?;
        envelope::decode_single(value)
    }

    /// Retrieves resources by identity via `POST {path}/byids`, batching
    /// and fanning out when the collection exceeds the item limit. Results
    /// preserve input order.
    pub async fn retrieve_multiple<T: DeserializeOwned>(
        &self,
        identities: &[Identity],
    ) -> Result<Vec<T>> {
        let batches = self.identity_batches(identities, "retrieve")?;
        let path = format!("{}/byids", self.path);
        let path = &path;
        let pages = execute_concurrently(batches, self.max_workers(), |batch| async move {
            let value = self.client.post(path, &envelope::items_body(&batch)?).await?;
            envelope::decode_items::<T>(value)
        })
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Lists resources, autopaging until the cursor is exhausted or
    /// `limit` items have been gathered.
    pub async fn list<T: DeserializeOwned>(
        &self,
        request: ListRequest,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        self.pages(request, stratus_core::MAX_PAGE_SIZE, limit)?
            .collect_all()
            .await
    }

    /// Returns a lazy page sequence over the list endpoint.
    pub fn pages<T: DeserializeOwned>(
        &self,
        request: ListRequest,
        page_size: usize,
        limit: Option<usize>,
    ) -> Result<CursorPages<'a, T>> {
        CursorPages::new(self.client, self.path, request, page_size, limit)
    }

    /// Creates resources via `POST {path}`, batching and fanning out.
    /// The returned records preserve input order.
    pub async fn create<T>(&self, items: Vec<T>) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if items.is_empty() {
            return Err(StratusError::Validation(format!(
                "no items to create under {}",
                self.path
            )));
        }
        let batches = chunk_items(items, self.batch_limit);
        let pages = execute_concurrently(batches, self.max_workers(), |batch| async move {
            let value = self
                .client
                .post(self.path, &envelope::items_body(&batch)?)
                .await?;
            envelope::decode_items::<T>(value)
        })
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Applies partial updates via `POST {path}/update`, returning the
    /// updated records in input order.
    pub async fn update<P, T>(&self, patches: Vec<P>) -> Result<Vec<T>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        if patches.is_empty() {
            return Err(StratusError::Validation(format!(
                "no items to update under {}",
                self.path
            )));
        }
        let path = format!("{}/update", self.path);
        let path = &path;
        let batches = chunk_items(patches, self.batch_limit);
        let pages = execute_concurrently(batches, self.max_workers(), |batch| async move {
            let value = self.client.post(path, &envelope::items_body(&batch)?).await?;
            envelope::decode_items::<T>(value)
        })
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Deletes resources by identity via `POST {path}/delete`.
    pub async fn delete(&self, identities: &[Identity]) -> Result<()> {
        let batches = self.identity_batches(identities, "delete")?;
        let path = format!("{}/delete", self.path);
        let path = &path;
        execute_concurrently(batches, self.max_workers(), |batch| async move {
            self.client.post(path, &envelope::items_body(&batch)?).await?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Deletes resources by bare numeric id, for endpoints whose delete
    /// body is a plain id list rather than wrapped identity objects.
    pub async fn delete_ids(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Err(StratusError::Validation(format!(
                "no ids specified for delete under {}",
                self.path
            )));
        }
        let path = format!("{}/delete", self.path);
        let path = &path;
        let batches = chunk_items(ids.to_vec(), self.batch_limit);
        execute_concurrently(batches, self.max_workers(), |batch| async move {
            self.client.post(path, &envelope::items_body(&batch)?).await?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Runs a fuzzy search via `POST {path}/search`. One call, no paging.
    pub async fn search<T: DeserializeOwned>(&self, body: Value) -> Result<Vec<T>> {
        let value = self.client.post(&format!("{}/search", self.path), &body).await?;
        envelope::decode_items(value)
    }

    fn identity_batches(
        &self,
        identities: &[Identity],
        operation: &str,
    ) -> Result<Vec<Vec<Identity>>> {
        if identities.is_empty() {
            return Err(StratusError::Validation(format!(
                "no ids specified for {operation} under {}",
                self.path
            )));
        }
        Ok(chunk_items(identities.to_vec(), self.batch_limit))
    }
}
