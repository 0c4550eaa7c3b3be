//! Resource APIs for the Stratus data platform.
//!
//! [`StratusClient`] is the entry point: it owns the retrying transport
//! and hands out per-resource API handles:
//!
//! - [`StratusClient::assets`] - Asset records
//! - [`StratusClient::files`] - File metadata and download links
//! - [`StratusClient::datapoints`] - Time-series datapoints

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stratus-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assets;
mod datapoints;
mod files;
mod resource;

pub use assets::AssetsApi;
pub use datapoints::{
    DPS_LIMIT_AGG, DPS_LIMIT_INSERT, DPS_LIMIT_RAW, DatapointsApi, DatapointsQuery,
};
pub use files::FilesApi;
pub use resource::{CRUD_LIMIT, Resource};

use stratus_http::{ApiClient, ClientConfig};
use stratus_types::Result;

/// Client for the Stratus data platform.
///
/// Construction takes an immutable [`ClientConfig`]; there is no shared
/// mutable state between calls, which is what makes concurrent sub-request
/// retry safe.
#[derive(Debug, Clone)]
pub struct StratusClient {
    api: ApiClient,
}

impl StratusClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Returns the assets API.
    #[must_use]
    pub const fn assets(&self) -> AssetsApi<'_> {
        AssetsApi::new(&self.api)
    }

    /// Returns the files API.
    #[must_use]
    pub const fn files(&self) -> FilesApi<'_> {
        FilesApi::new(&self.api)
    }

    /// Returns the datapoints API.
    #[must_use]
    pub const fn datapoints(&self) -> DatapointsApi<'_> {
        DatapointsApi::new(&self.api)
    }

    /// Returns the underlying transport, for endpoints this SDK does not
    /// model.
    #[must_use]
    pub const fn transport(&self) -> &ApiClient {
        &self.api
    }
}
