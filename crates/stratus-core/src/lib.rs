//! Request partitioning, concurrent execution and result merging for the
//! Stratus SDK.
//!
//! This crate is the engine shared by bulk CRUD and datapoints retrieval:
//!
//! - [`split_windows`] - Partitions a time range into concurrent fetch windows
//! - [`chunk_items`] - Splits bulk payloads under the server item limit
//! - [`execute_concurrently`] - Bounded fan-out with first-fatal-error abort
//! - [`merge_series`] - Order-preserving, deduplicating series merge
//! - [`CursorPages`] - Consumer-driven cursor pagination

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stratus-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod executor;
mod merge;
mod paginate;
mod window;

pub use batch::chunk_items;
pub use executor::execute_concurrently;
pub use merge::merge_series;
pub use paginate::{ChunkedPages, CursorPages, ListRequest, MAX_PAGE_SIZE};
pub use window::{Window, split_windows};
