//! Order-preserving merge of per-window fetch results.

use std::collections::BTreeMap;

use stratus_types::{Datapoint, DatapointSeries};

/// Merges the per-window series of one target into a single series.
///
/// Parts are visited in window order; points are keyed by timestamp with
/// first-occurrence-wins, so a timestamp reported at a window boundary is
/// attributed to exactly one window. The output is strictly ascending by
/// timestamp even when individual server responses are unsorted.
///
/// `limit` truncation happens only after the full merge: truncating a
/// single window's contribution first would break the global prefix when a
/// small per-window fetch limit meets a small worker count.
pub fn merge_series(parts: Vec<DatapointSeries>, limit: Option<usize>) -> DatapointSeries {
    let mut id = None;
    let mut external_id = None;
    let mut points: BTreeMap<i64, Datapoint> = BTreeMap::new();

    for part in parts {
        id = id.or(part.id);
        external_id = external_id.or(part.external_id);
        for dp in part.datapoints {
            points.entry(dp.timestamp).or_insert(dp);
        }
    }

    let mut datapoints: Vec<Datapoint> = points.into_values().collect();
    if let Some(limit) = limit {
        datapoints.truncate(limit);
    }
    DatapointSeries {
        id,
        external_id,
        datapoints,
    }
}
