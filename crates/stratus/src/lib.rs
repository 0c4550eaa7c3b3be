//! Rust SDK for the Stratus data platform.
//!
//! This is a facade crate that re-exports functionality from the stratus
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use stratus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("my-project", std::env::var("STRATUS_API_KEY")?);
//!     let client = StratusClient::new(config)?;
//!
//!     let series = client
//!         .datapoints()
//!         .retrieve(DatapointsQuery::new(123, 1_500_000_000_000, 1_600_000_000_000))
//!         .await?;
//!     println!("fetched {} datapoints", series.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stratus-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use stratus_types::*;

// Re-export transport and configuration
pub use stratus_http::{ApiClient, ClientConfig, ItemsPage};

// Re-export the partitioning/merging engine
pub use stratus_core::{
    ChunkedPages, CursorPages, ListRequest, MAX_PAGE_SIZE, Window, chunk_items,
    execute_concurrently, merge_series, split_windows,
};

// Re-export resource APIs
pub use stratus_api::{
    AssetsApi, DatapointsApi, DatapointsQuery, FilesApi, Resource, StratusClient,
};

/// Prelude module for convenient imports.
///
/// ```
/// use stratus::prelude::*;
/// ```
pub mod prelude {
    pub use stratus_types::{
        Asset, AssetFilter, AssetPatch, Datapoint, DatapointSeries, FileFilter, FileMeta,
        FilePatch, Granularity, Identity, InsertItem, Result, StratusError,
    };

    pub use stratus_http::ClientConfig;

    pub use stratus_api::{
        AssetsApi, DatapointsApi, DatapointsQuery, FilesApi, StratusClient,
    };
}
