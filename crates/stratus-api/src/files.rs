//! Files API.
//!
//! Covers file metadata and download-link retrieval. Byte content moves
//! through the returned links, outside this SDK.

use stratus_core::{ChunkedPages, CursorPages, ListRequest};
use stratus_http::{ApiClient, envelope};
use stratus_types::{DownloadLink, FileFilter, FileMeta, FilePatch, Identity, Result};

use crate::resource::Resource;

const RESOURCE_PATH: &str = "/files";

/// API for file metadata.
#[derive(Debug, Clone)]
pub struct FilesApi<'a> {
    resource: Resource<'a>,
    client: &'a ApiClient,
}

impl<'a> FilesApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self {
            resource: Resource::new(client, RESOURCE_PATH),
            client,
        }
    }

    /// Retrieves a single file's metadata by id.
    pub async fn retrieve(&self, id: i64) -> Result<FileMeta> {
        self.resource.retrieve(id).await
    }

    /// Retrieves file metadata by identity, preserving input order.
    pub async fn retrieve_multiple(&self, identities: &[Identity]) -> Result<Vec<FileMeta>> {
        self.resource.retrieve_multiple(identities).await
    }

    /// Lists files matching the filter, autopaging up to `limit` items.
    /// The files endpoint takes its filter as a POST body.
    pub async fn list(&self, filter: &FileFilter, limit: Option<usize>) -> Result<Vec<FileMeta>> {
        let request = ListRequest::Post {
            filter: filter.to_json(),
        };
        self.resource.list(request, limit).await
    }

    /// Returns a lazy chunk sequence over matching files.
    pub fn iter_chunks(
        &self,
        filter: &FileFilter,
        chunk_size: usize,
        limit: Option<usize>,
    ) -> Result<ChunkedPages<'a, FileMeta>> {
        let request = ListRequest::Post {
            filter: filter.to_json(),
        };
        let pages: CursorPages<'a, FileMeta> =
            self.resource.pages(request, stratus_core::MAX_PAGE_SIZE, limit)?;
        pages.chunked(chunk_size)
    }

    /// Applies a single partial update, returning the updated record.
    pub async fn update(&self, patch: FilePatch) -> Result<FileMeta> {
        Ok(self
            .resource
            .update(vec![patch])
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Applies partial updates, returning the updated records in input
    /// order.
    pub async fn update_multiple(&self, patches: Vec<FilePatch>) -> Result<Vec<FileMeta>> {
        self.resource.update(patches).await
    }

    /// Deletes files by identity.
    pub async fn delete(&self, identities: &[Identity]) -> Result<()> {
        self.resource.delete(identities).await
    }

    /// Fetches short-lived download links for the given files.
    pub async fn download_links(&self, identities: &[Identity]) -> Result<Vec<DownloadLink>> {
        if identities.is_empty() {
            return Err(stratus_types::StratusError::Validation(
                "no ids specified for download links".to_string(),
            ));
        }
        let body = envelope::items_body(&identities)?;
        let value = self
            .client
            .post(&format!("{RESOURCE_PATH}/download"), &body)
            .await?;
        envelope::decode_items(value)
    }
}
