//! Cursor-driven autopaging of list endpoints.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::marker::PhantomData;
use tracing::debug;

use stratus_http::{ApiClient, envelope};
use stratus_types::{Result, StratusError};

/// The largest page size the platform accepts.
pub const MAX_PAGE_SIZE: usize = 1_000;

/// How a list endpoint is driven.
#[derive(Debug, Clone)]
pub enum ListRequest {
    /// GET with the filter encoded as query parameters.
    Get {
        /// Filter parameters appended to every page request.
        params: Vec<(&'static str, String)>,
    },
    /// POST to `{path}/list` with a JSON `filter` object.
    Post {
        /// Filter object sent with every page request.
        filter: Value,
    },
}

/// A consumer-driven sequence of list pages.
///
/// Each [`next_page`](Self::next_page) call issues exactly one HTTP request
/// carrying the previous response's continuation cursor; nothing is
/// prefetched. The sequence ends when the server returns a null cursor or
/// the cumulative item count reaches the overall limit. A pagination run is
/// not resumable mid-stream; restart by constructing a new value from the
/// original filter.
#[derive(Debug)]
pub struct CursorPages<'a, T> {
    client: &'a ApiClient,
    path: String,
    request: ListRequest,
    page_size: usize,
    remaining: Option<usize>,
    cursor: Option<String>,
    exhausted: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> CursorPages<'a, T> {
    /// Creates a paginator over `path`.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `page_size` is zero or exceeds
    /// the server maximum of 1000.
    pub fn new(
        client: &'a ApiClient,
        path: impl Into<String>,
        request: ListRequest,
        page_size: usize,
        overall_limit: Option<usize>,
    ) -> Result<Self> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(StratusError::Validation(format!(
                "page size {page_size} must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            client,
            path: path.into(),
            request,
            page_size,
            remaining: overall_limit,
            cursor: None,
            exhausted: false,
            _marker: PhantomData,
        })
    }

    /// Fetches the next page, or `None` once the sequence has ended.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if self.exhausted {
            return Ok(None);
        }
        let limit = match self.remaining {
            Some(0) => {
                self.exhausted = true;
                return Ok(None);
            }
            Some(remaining) => remaining.min(self.page_size),
            None => self.page_size,
        };

        let value = match &self.request {
            ListRequest::Get { params } => {
                let mut params: Vec<(&'static str, String)> = params.clone();
                params.push(("limit", limit.to_string()));
                if let Some(cursor) = &self.cursor {
                    params.push(("cursor", cursor.clone()));
                }
                self.client.get(&self.path, &params).await?
            }
            ListRequest::Post { filter } => {
                let body = json!({
                    "filter": filter,
                    "limit": limit,
                    "cursor": self.cursor,
                });
                self.client
                    .post(&format!("{}/list", self.path), &body)
                    .await?
            }
        };

        let page = envelope::decode_page::<T>(value)?;
        let mut items = page.items;
        if let Some(remaining) = &mut self.remaining {
            items.truncate(*remaining);
            *remaining -= items.len();
        }
        self.cursor = page.next_cursor;
        if self.cursor.is_none() {
            self.exhausted = true;
        }
        debug!(
            path = %self.path,
            fetched = items.len(),
            exhausted = self.exhausted,
            "fetched list page"
        );
        Ok(Some(items))
    }

    /// Drains the remaining pages into one vector.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }

    /// Regroups the sequence into fixed-size chunks spanning page
    /// boundaries.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `chunk_size` is zero or exceeds
    /// the server maximum of 1000.
    pub fn chunked(self, chunk_size: usize) -> Result<ChunkedPages<'a, T>> {
        if chunk_size == 0 || chunk_size > MAX_PAGE_SIZE {
            return Err(StratusError::Validation(format!(
                "chunk size {chunk_size} must not exceed {MAX_PAGE_SIZE}"
            )));
        }
        Ok(ChunkedPages {
            pages: self,
            chunk_size,
            buffer: Vec::new(),
        })
    }
}

/// A [`CursorPages`] sequence regrouped into fixed-size chunks.
///
/// Every chunk except possibly the last holds exactly `chunk_size` items.
#[derive(Debug)]
pub struct ChunkedPages<'a, T> {
    pages: CursorPages<'a, T>,
    chunk_size: usize,
    buffer: Vec<T>,
}

impl<T: DeserializeOwned> ChunkedPages<'_, T> {
    /// Fetches pages until a full chunk is buffered, or `None` once the
    /// sequence has ended.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<T>>> {
        while self.buffer.len() < self.chunk_size {
            match self.pages.next_page().await? {
                Some(items) => self.buffer.extend(items),
                None => break,
            }
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let take = self.chunk_size.min(self.buffer.len());
        let rest = self.buffer.split_off(take);
        let chunk = std::mem::replace(&mut self.buffer, rest);
        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const LIST_PATH: &str = "/api/0.6/projects/test-proj/someurl";

    fn client(server: &MockServer) -> ApiClient {
        let config = stratus_http::ClientConfig::new("test-proj", "k").with_base_url(server.uri());
        ApiClient::new(config).unwrap()
    }

    /// Serves `total` items through cursor paging, like the platform does.
    async fn mount_paged_get(server: &MockServer, total: usize) {
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(move |req: &Request| {
                let mut limit = 0usize;
                let mut cursor = 0usize;
                for (key, value) in req.url.query_pairs() {
                    match key.as_ref() {
                        "limit" => limit = value.parse().unwrap(),
                        "cursor" => cursor = value.parse().unwrap(),
                        _ => {}
                    }
                }
                let end = (cursor + limit).min(total);
                let items: Vec<Value> = (cursor..end).map(|i| json!({"x": i})).collect();
                let next_cursor = if end >= total {
                    Value::Null
                } else {
                    Value::String(end.to_string())
                };
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"items": items, "nextCursor": next_cursor}}))
            })
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_pages_until_cursor_exhausted() {
        let server = MockServer::start().await;
        mount_paged_get(&server, 25).await;
        let client = client(&server);

        let pages = CursorPages::<Value>::new(
            &client,
            "/someurl",
            ListRequest::Get { params: Vec::new() },
            10,
            None,
        )
        .unwrap();
        let all = pages.collect_all().await.unwrap();
        assert_eq!(25, all.len());
        assert_eq!(json!({"x": 24}), all[24]);
        // 3 pages: 10 + 10 + 5.
        assert_eq!(3, server.received_requests().await.unwrap().len());
    }

    #[tokio::test]
    async fn test_overall_limit_truncates_final_page() {
        let server = MockServer::start().await;
        mount_paged_get(&server, 11_500).await;
        let client = client(&server);

        let pages = CursorPages::<Value>::new(
            &client,
            "/someurl",
            ListRequest::Get { params: Vec::new() },
            1_000,
            Some(5_333),
        )
        .unwrap();
        let all = pages.collect_all().await.unwrap();
        assert_eq!(5_333, all.len());
        // 6 pages: 5 full pages then a 333-item remainder request.
        assert_eq!(6, server.received_requests().await.unwrap().len());
    }

    #[tokio::test]
    async fn test_post_list_body_carries_filter_and_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{LIST_PATH}/list")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"items": [{"x": 1}], "nextCursor": null}
            })))
            .mount(&server)
            .await;
        let client = client(&server);

        let mut pages = CursorPages::<Value>::new(
            &client,
            "/someurl",
            ListRequest::Post {
                filter: json!({"filter": "bla"}),
            },
            1_000,
            None,
        )
        .unwrap();
        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(1, first.len());
        assert_eq!(None, pages.next_page().await.unwrap());

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            json!({"filter": {"filter": "bla"}, "limit": 1000, "cursor": null}),
            body
        );
    }

    #[tokio::test]
    async fn test_chunked_regroups_across_pages() {
        let server = MockServer::start().await;
        mount_paged_get(&server, 25).await;
        let client = client(&server);

        let mut chunks = CursorPages::<Value>::new(
            &client,
            "/someurl",
            ListRequest::Get { params: Vec::new() },
            10,
            None,
        )
        .unwrap()
        .chunked(7)
        .unwrap();

        let mut sizes = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            sizes.push(chunk.len());
        }
        assert_eq!(vec![7, 7, 7, 4], sizes);
    }

    #[test]
    fn test_page_size_validation() {
        let config = stratus_http::ClientConfig::new("p", "k");
        let client = ApiClient::new(config).unwrap();
        let result = CursorPages::<Value>::new(
            &client,
            "/someurl",
            ListRequest::Get { params: Vec::new() },
            1_001,
            None,
        );
        assert!(matches!(result, Err(StratusError::Validation(_))));
    }
}
