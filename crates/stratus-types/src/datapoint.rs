//! Datapoint representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Identity;

/// A single datapoint.
///
/// Raw datapoints carry a `value`; aggregate datapoints instead carry one
/// entry per requested aggregate (e.g. `"average"`, `"max"`), captured in
/// [`Datapoint::aggregates`]. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Timestamp in milliseconds since epoch.
    pub timestamp: i64,
    /// Raw value, absent on aggregate datapoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Aggregate name to value, absent on raw datapoints.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregates: BTreeMap<String, f64>,
}

impl Datapoint {
    /// Creates a raw datapoint.
    #[must_use]
    pub const fn raw(timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            value: Some(value),
            aggregates: BTreeMap::new(),
        }
    }

    /// Returns the named aggregate value, if present.
    #[must_use]
    pub fn aggregate(&self, name: &str) -> Option<f64> {
        self.aggregates.get(name).copied()
    }
}

impl From<(i64, f64)> for Datapoint {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self::raw(timestamp, value)
    }
}

/// The merged, timestamp-ordered series of one time series target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatapointSeries {
    /// Numeric id of the time series, as reported by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// External id of the time series, as reported by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Datapoints in strictly ascending timestamp order.
    #[serde(default)]
    pub datapoints: Vec<Datapoint>,
}

impl DatapointSeries {
    /// Returns the number of datapoints in the series.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.datapoints.len()
    }

    /// Returns true if the series holds no datapoints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }

    /// Truncates the series to its first `limit` datapoints.
    pub fn truncate(&mut self, limit: usize) {
        self.datapoints.truncate(limit);
    }
}

/// Datapoints destined for one time series, the unit of insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertItem {
    /// The target time series.
    #[serde(flatten)]
    pub identity: Identity,
    /// Points to write, in ascending timestamp order.
    pub datapoints: Vec<Datapoint>,
}

impl InsertItem {
    /// Creates an insert item for the given target.
    pub fn new(identity: impl Into<Identity>, datapoints: Vec<Datapoint>) -> Self {
        Self {
            identity: identity.into(),
            datapoints,
        }
    }
}
