//! HTTP transport for the Stratus SDK.
//!
//! This crate provides the request/response plumbing shared by every API:
//!
//! - [`ClientConfig`] - Immutable client configuration
//! - [`ApiClient`] - Retrying JSON transport with gzip request compression
//! - [`envelope`] - `data.items` response envelope decoding

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stratus-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod envelope;
mod transport;

pub use config::ClientConfig;
pub use envelope::ItemsPage;
pub use transport::{ApiClient, GZIP_MIN_BYTES};
