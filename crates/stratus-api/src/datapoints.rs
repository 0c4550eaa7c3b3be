//! Time-series datapoints API.
//!
//! Retrieval splits the requested interval into windows (bounded by the
//! worker-pool size), fetches every window concurrently with continuation
//! paging inside each, and reassembles one timestamp-ordered series per
//! target. Insertion chunks the payload under the server item limit.

use serde_json::{Map, Value, json};
use tracing::debug;

use stratus_core::{Window, chunk_items, execute_concurrently, merge_series, split_windows};
use stratus_http::{ApiClient, envelope};
use stratus_types::{
    Datapoint, DatapointSeries, Granularity, Identity, InsertItem, Result, StratusError,
};

const GET_PATH: &str = "/timeseries/data/get";
const LATEST_PATH: &str = "/timeseries/data/latest";
const INSERT_PATH: &str = "/timeseries/data";

/// Per-request datapoint limit for raw retrieval.
pub const DPS_LIMIT_RAW: usize = 100_000;
/// Per-request datapoint limit for aggregate retrieval.
pub const DPS_LIMIT_AGG: usize = 10_000;
/// Per-request datapoint limit for insertion.
pub const DPS_LIMIT_INSERT: usize = 100_000;

/// One target's retrieval parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DatapointsQuery {
    /// The time series to read.
    pub identity: Identity,
    /// Range start (inclusive), epoch milliseconds.
    pub start: i64,
    /// Range end (exclusive), epoch milliseconds.
    pub end: i64,
    /// Aggregates to compute, e.g. `"average"`. Requires `granularity`.
    pub aggregates: Option<Vec<String>>,
    /// Aggregation period. Requires `aggregates`.
    pub granularity: Option<Granularity>,
    /// Maximum number of datapoints to return for this target.
    pub limit: Option<usize>,
}

impl DatapointsQuery {
    /// Queries raw datapoints of `identity` over `[start, end)`.
    pub fn new(identity: impl Into<Identity>, start: i64, end: i64) -> Self {
        Self {
            identity: identity.into(),
            start,
            end,
            aggregates: None,
            granularity: None,
            limit: None,
        }
    }

    /// Requests aggregates instead of raw values. The two parameters are
    /// only meaningful together, so they are set together.
    #[must_use]
    pub fn with_aggregates(mut self, aggregates: Vec<String>, granularity: Granularity) -> Self {
        self.aggregates = Some(aggregates);
        self.granularity = Some(granularity);
        self
    }

    /// Caps the number of returned datapoints.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// API for reading and writing time-series datapoints.
#[derive(Debug, Clone)]
pub struct DatapointsApi<'a> {
    client: &'a ApiClient,
    max_workers: usize,
    limit_raw: usize,
    limit_agg: usize,
    limit_insert: usize,
}

impl<'a> DatapointsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            max_workers: client.config().max_workers,
            limit_raw: DPS_LIMIT_RAW,
            limit_agg: DPS_LIMIT_AGG,
            limit_insert: DPS_LIMIT_INSERT,
        }
    }

    /// Overrides the per-request fetch limits for this handle.
    #[must_use]
    pub const fn with_fetch_limits(mut self, raw: usize, agg: usize) -> Self {
        self.limit_raw = raw;
        self.limit_agg = agg;
        self
    }

    /// Overrides the per-request insert limit for this handle.
    #[must_use]
    pub const fn with_insert_limit(mut self, limit: usize) -> Self {
        self.limit_insert = limit;
        self
    }

    /// Overrides the worker-pool size for this handle.
    #[must_use]
    pub const fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Retrieves the datapoints of a single target.
    pub async fn retrieve(&self, query: DatapointsQuery) -> Result<DatapointSeries> {
        Ok(self.query(vec![query]).await?.pop().unwrap_or_default())
    }

    /// Retrieves datapoints for several targets, each with its own range,
    /// aggregates and limit. The result preserves query order.
    pub async fn query(&self, queries: Vec<DatapointsQuery>) -> Result<Vec<DatapointSeries>> {
        for query in &queries {
            validate_query(query)?;
        }

        struct WindowTask<'q> {
            index: usize,
            query: &'q DatapointsQuery,
            window: Window,
            per_request_limit: usize,
            overall_limit: Option<usize>,
        }

        let mut tasks = Vec::new();
        for (index, query) in queries.iter().enumerate() {
            // An empty range yields an empty series without any call.
            if query.start >= query.end {
                continue;
            }
            let per_request_limit = if query.aggregates.is_some() {
                self.limit_agg
            } else {
                self.limit_raw
            };
            if let Some(limit) = query.limit {
                // A caller limit forces the serial single-window path: the
                // global prefix must come from the front of the range.
                tasks.push(WindowTask {
                    index,
                    query,
                    window: Window::new(query.start, query.end),
                    per_request_limit,
                    overall_limit: Some(limit),
                });
            } else {
                let granularity_ms = query.granularity.map(|g| g.as_millis());
                for window in
                    split_windows(query.start, query.end, granularity_ms, self.max_workers)
                {
                    tasks.push(WindowTask {
                        index,
                        query,
                        window,
                        per_request_limit,
                        overall_limit: None,
                    });
                }
            }
        }
        debug!(targets = queries.len(), windows = tasks.len(), "fetching datapoints");

        let parts = execute_concurrently(tasks, self.max_workers, |task| async move {
            let series = self
                .fetch_window(task.query, task.window, task.per_request_limit, task.overall_limit)
                .await?;
            Ok((task.index, series))
        })
        .await?;

        let mut grouped: Vec<Vec<DatapointSeries>> =
            std::iter::repeat_with(Vec::new).take(queries.len()).collect();
        for (index, series) in parts {
            grouped[index].push(series);
        }
        Ok(queries
            .iter()
            .zip(grouped)
            .map(|(query, parts)| merge_series(parts, query.limit))
            .collect())
    }

    /// Returns the most recent datapoint of a target, optionally before a
    /// given timestamp.
    pub async fn latest(
        &self,
        target: impl Into<Identity>,
        before: Option<i64>,
    ) -> Result<DatapointSeries> {
        Ok(self
            .latest_multiple(vec![target.into()], before)
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Returns the most recent datapoint of each target.
    pub async fn latest_multiple(
        &self,
        targets: Vec<Identity>,
        before: Option<i64>,
    ) -> Result<Vec<DatapointSeries>> {
        if targets.is_empty() {
            return Err(StratusError::Validation(
                "no targets specified for latest datapoint".to_string(),
            ));
        }
        let items: Vec<Value> = targets
            .iter()
            .map(|target| {
                let mut item = identity_object(target);
                if let Some(before) = before {
                    item.insert("before".to_string(), before.into());
                }
                Value::Object(item)
            })
            .collect();
        let value = self.client.post(LATEST_PATH, &json!({ "items": items })).await?;
        envelope::decode_items(value)
    }

    /// Inserts datapoints into a single time series.
    pub async fn insert(
        &self,
        target: impl Into<Identity>,
        datapoints: Vec<Datapoint>,
    ) -> Result<()> {
        self.insert_multiple(vec![InsertItem::new(target.into(), datapoints)])
            .await
    }

    /// Inserts datapoints into several time series. Payloads larger than
    /// the per-request limit are split into chronologically contiguous
    /// chunks, one call per chunk.
    pub async fn insert_multiple(&self, items: Vec<InsertItem>) -> Result<()> {
        if items.is_empty() {
            return Err(StratusError::Validation("no datapoints provided".to_string()));
        }
        let mut tasks = Vec::new();
        for item in items {
            validate_insert(&item)?;
            let identity = item.identity;
            for datapoints in chunk_items(item.datapoints, self.limit_insert) {
                tasks.push(InsertItem {
                    identity: identity.clone(),
                    datapoints,
                });
            }
        }
        debug!(requests = tasks.len(), "inserting datapoints");
        execute_concurrently(tasks, self.max_workers, |task| async move {
            let body = json!({ "items": serde_json::to_value(&task)? });
            self.client.post(INSERT_PATH, &body).await?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Fetches one window, following the continuation paging protocol:
    /// when a response fills the request limit, the fetch resumes from the
    /// last seen timestamp plus one granularity unit (raw data: plus one
    /// millisecond) until a short page arrives or the window is exhausted.
    async fn fetch_window(
        &self,
        query: &DatapointsQuery,
        window: Window,
        per_request_limit: usize,
        overall_limit: Option<usize>,
    ) -> Result<DatapointSeries> {
        let step_ms = query.granularity.map_or(1, |g| g.as_millis());
        let mut merged = DatapointSeries::default();
        let mut next_start = window.start;

        while next_start < window.end {
            let remaining = overall_limit.map(|limit| limit.saturating_sub(merged.len()));
            if remaining == Some(0) {
                break;
            }
            let request_limit = remaining.map_or(per_request_limit, |r| r.min(per_request_limit));

            let body = query_body(query, next_start, window.end, request_limit);
            let value = self.client.post(GET_PATH, &body).await?;
            let page: DatapointSeries = envelope::decode_single(value)?;

            let count = page.len();
            let last_timestamp = page.datapoints.last().map(|dp| dp.timestamp);
            if merged.id.is_none() {
                merged.id = page.id;
            }
            if merged.external_id.is_none() {
                merged.external_id = page.external_id;
            }
            merged.datapoints.extend(page.datapoints);

            if count < request_limit {
                break;
            }
            match last_timestamp {
                Some(ts) => next_start = ts + step_ms,
                None => break,
            }
        }
        Ok(merged)
    }
}

fn validate_query(query: &DatapointsQuery) -> Result<()> {
    match (&query.aggregates, &query.granularity) {
        (Some(aggregates), Some(_)) if aggregates.is_empty() => Err(StratusError::Validation(
            format!("at least one aggregate is required for {}", query.identity),
        )),
        (Some(_), Some(_)) | (None, None) => Ok(()),
        _ => Err(StratusError::Validation(format!(
            "aggregates and granularity must be specified together for {}",
            query.identity
        ))),
    }
}

fn validate_insert(item: &InsertItem) -> Result<()> {
    if item.datapoints.is_empty() {
        return Err(StratusError::Validation(format!(
            "no datapoints provided for {}",
            item.identity
        )));
    }
    for dp in &item.datapoints {
        if dp.timestamp <= stratus_types::timestamp::MIN_TIMESTAMP_MS {
            return Err(StratusError::Validation(format!(
                "datapoint timestamp must be positive, got {}",
                dp.timestamp
            )));
        }
        if dp.value.is_none() {
            return Err(StratusError::Validation(format!(
                "datapoint at {} is missing a value",
                dp.timestamp
            )));
        }
    }
    Ok(())
}

fn identity_object(identity: &Identity) -> Map<String, Value> {
    let mut item = Map::new();
    match identity {
        Identity::Id { id } => {
            item.insert("id".to_string(), (*id).into());
        }
        Identity::ExternalId { external_id } => {
            item.insert("externalId".to_string(), external_id.clone().into());
        }
    }
    item
}

fn query_body(query: &DatapointsQuery, start: i64, end: i64, limit: usize) -> Value {
    let mut item = identity_object(&query.identity);
    item.insert("start".to_string(), start.into());
    item.insert("end".to_string(), end.into());
    item.insert("limit".to_string(), limit.into());
    if let Some(aggregates) = &query.aggregates {
        item.insert("aggregates".to_string(), json!(aggregates));
    }
    if let Some(granularity) = &query.granularity {
        item.insert("granularity".to_string(), granularity.to_string().into());
    }
    json!({ "items": [Value::Object(item)] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates_require_granularity() {
        let query = DatapointsQuery {
            aggregates: Some(vec!["average".to_string()]),
            ..DatapointsQuery::new(1, 0, 10)
        };
        assert!(matches!(
            validate_query(&query),
            Err(StratusError::Validation(_))
        ));

        let query = DatapointsQuery {
            granularity: Some("1s".parse().unwrap()),
            ..DatapointsQuery::new(1, 0, 10)
        };
        assert!(matches!(
            validate_query(&query),
            Err(StratusError::Validation(_))
        ));

        let query = DatapointsQuery::new(1, 0, 10)
            .with_aggregates(vec!["average".to_string()], "1s".parse().unwrap());
        assert!(validate_query(&query).is_ok());
    }

    #[test]
    fn test_empty_aggregate_list_rejected() {
        let query = DatapointsQuery::new(1, 0, 10).with_aggregates(vec![], "1s".parse().unwrap());
        assert!(matches!(
            validate_query(&query),
            Err(StratusError::Validation(_))
        ));
    }

    #[test]
    fn test_insert_validation() {
        let ok = InsertItem::new(1, vec![Datapoint::raw(10, 1.0)]);
        assert!(validate_insert(&ok).is_ok());

        let empty = InsertItem::new(1, vec![]);
        assert!(matches!(
            validate_insert(&empty),
            Err(StratusError::Validation(_))
        ));

        let at_epoch = InsertItem::new(1, vec![Datapoint::raw(0, 1.0)]);
        assert!(matches!(
            validate_insert(&at_epoch),
            Err(StratusError::Validation(_))
        ));

        let missing_value = InsertItem::new(
            1,
            vec![Datapoint {
                timestamp: 10,
                value: None,
                aggregates: std::collections::BTreeMap::new(),
            }],
        );
        assert!(matches!(
            validate_insert(&missing_value),
            Err(StratusError::Validation(_))
        ));
    }

    #[test]
    fn test_query_body_shape() {
        let query = DatapointsQuery::new(123, 0, 20_000)
            .with_aggregates(vec!["average".to_string()], "1s".parse().unwrap());
        assert_eq!(
            json!({"items": [{
                "id": 123,
                "start": 0,
                "end": 4_000,
                "limit": 10_000,
                "aggregates": ["average"],
                "granularity": "1s",
            }]}),
            query_body(&query, 0, 4_000, 10_000)
        );
    }
}
