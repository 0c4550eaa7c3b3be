//! Core types for the Stratus data platform SDK.
//!
//! This crate provides the fundamental data structures used throughout the
//! SDK:
//!
//! - [`Identity`] - Resource identity, numeric id or external id
//! - [`Datapoint`] / [`DatapointSeries`] - Time series datapoints
//! - [`Granularity`] - Aggregation period for datapoint retrieval
//! - [`Asset`] / [`FileMeta`] - Resource records
//! - [`StratusError`] - The SDK-wide error taxonomy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stratus-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod asset;
mod datapoint;
mod error;
mod file;
mod granularity;
mod identity;
mod patch;
pub mod timestamp;

pub use asset::{Asset, AssetFilter, AssetPatch, AssetUpdate};
pub use datapoint::{Datapoint, DatapointSeries, InsertItem};
pub use error::{ApiError, Result, StratusError};
pub use file::{DownloadLink, FileFilter, FileMeta, FilePatch, FileUpdate};
pub use granularity::{Granularity, GranularityParseError, GranularityUnit};
pub use identity::Identity;
pub use patch::FieldUpdate;
