//! Retrying JSON transport.

use std::io::Write;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use reqwest::header::{ACCEPT, CONTENT_ENCODING, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use stratus_types::{Result, StratusError};

use crate::ClientConfig;

/// Platform API version baked into every request path.
const API_VERSION: &str = "0.6";

/// Request bodies below this size are sent uncompressed even when gzip is
/// enabled; the savings would not cover the header overhead.
pub const GZIP_MIN_BYTES: usize = 1024;

/// HTTP client with connection pooling, gzip request compression, and
/// retry logic.
///
/// One transport call is one HTTP request plus its internal retry loop:
/// 5xx and 429 responses and connection-level failures are retried with
/// exponential backoff (honoring a numeric `Retry-After` header when the
/// platform sends one); 4xx responses surface immediately.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    project_url: String,
}

impl ApiClient {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_workers)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| StratusError::Transport(e.to_string()))?;
        let project_url = format!(
            "{}/api/{}/projects/{}",
            config.base_url, API_VERSION, config.project
        );
        Ok(Self {
            client,
            config,
            project_url,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a GET request with query parameters.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, params, None).await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Issues a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.project_url, path);
        let payload = match body {
            Some(value) => Some(self.encode_body(value)?),
            None => None,
        };

        let mut attempts = 0;
        loop {
            let mut builder = self
                .client
                .request(method.clone(), &url)
                .header("api-key", &self.config.api_key)
                .header(ACCEPT, "application/json")
                .query(params);
            if let Some(encoded) = &payload {
                builder = builder.header(CONTENT_TYPE, "application/json");
                if encoded.gzipped {
                    builder = builder.header(CONTENT_ENCODING, "gzip");
                }
                builder = builder.body(encoded.bytes.clone());
            }
            debug!(%method, %url, attempt = attempts + 1, "sending request");

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(%method, %url, %status, "received response");
                    if status.is_success() {
                        let text = response
                            .text()
                            .await
                            .map_err(|e| StratusError::Transport(e.to_string()))?;
                        if text.trim().is_empty() {
                            return Ok(Value::Null);
                        }
                        return Ok(serde_json::from_str(&text)?);
                    }

                    let retry_after = parse_retry_after(&response);
                    let request_id = response
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let text = response.text().await.unwrap_or_default();
                    let error = translate_error(status, &text, request_id);
                    if error.is_retryable() && attempts < self.config.max_retries {
                        attempts += 1;
                        let delay =
                            retry_after.unwrap_or_else(|| self.backoff_delay(attempts));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(error);
                }
                Err(e) if is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.backoff_delay(attempts);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(StratusError::Transport(e.to_string())),
            }
        }
    }

    /// Serializes and, when worthwhile, compresses a request body.
    fn encode_body(&self, body: &Value) -> Result<EncodedBody> {
        let bytes = serde_json::to_vec(body)?;
        if self.config.gzip && bytes.len() >= GZIP_MIN_BYTES {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&bytes)
                .and_then(|()| encoder.finish())
                .map(|compressed| EncodedBody {
                    bytes: compressed,
                    gzipped: true,
                })
                .map_err(|e| StratusError::Transport(format!("gzip failed: {e}")))
        } else {
            Ok(EncodedBody {
                bytes,
                gzipped: false,
            })
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter (±25%) keyed off the attempt number; avoids
        // pulling in a random number generator.
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            jitter_offset.saturating_sub(jitter_range)
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter as i64).max(1) as u64;
        Duration::from_millis(final_delay)
    }
}

#[derive(Debug)]
struct EncodedBody {
    bytes: Vec<u8>,
    gzipped: bool,
}

/// Translates a non-2xx response into a structured error.
///
/// The platform reports errors as `{"error": {"code", "message"}}`, as
/// `{"error": "text"}` when it fails before producing structured JSON, or
/// as a bare body.
fn translate_error(status: StatusCode, body: &str, request_id: Option<String>) -> StratusError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            let error = value.get("error")?.clone();
            if let Some(text) = error.as_str() {
                return Some(text.to_string());
            }
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());
    StratusError::from_status(status.as_u16(), message, request_id)
}

/// Parses a numeric `Retry-After` header, the platform's own backoff hint.
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Determines if a connection-level error is retryable.
fn is_retryable_error(error: &reqwest::Error) -> bool {
    // Builder errors are configuration issues; retrying cannot help.
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn test_config(base_url: &str) -> ClientConfig {
        let mut config = ClientConfig::new("test-proj", "secret").with_base_url(base_url);
        config.base_delay_ms = 1;
        config.max_delay_ms = 5;
        config.max_retries = 3;
        config
    }

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(test_config(&server.uri())).unwrap()
    }

    const URL_PATH: &str = "/api/0.6/projects/test-proj/someurl";

    #[tokio::test]
    async fn test_requests_ok() {
        let server = MockServer::start().await;
        for m in ["GET", "POST", "PUT", "DELETE"] {
            Mock::given(method(m))
                .and(path(URL_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"any": "ok"})))
                .mount(&server)
                .await;
        }

        let client = client(&server);
        assert_eq!(json!({"any": "ok"}), client.get("/someurl", &[]).await.unwrap());
        assert_eq!(
            json!({"any": "ok"}),
            client.post("/someurl", &json!({"any": "ok"})).await.unwrap()
        );
        assert_eq!(
            json!({"any": "ok"}),
            client.put("/someurl", &json!({"any": "ok"})).await.unwrap()
        );
        assert_eq!(json!({"any": "ok"}), client.delete("/someurl").await.unwrap());
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(URL_PATH))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"code": 400, "message": "Client error"}}))
                    .insert_header("x-request-id", "req-1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).get("/someurl", &[]).await.unwrap_err();
        match err {
            StratusError::Client(api) => {
                assert_eq!(400, api.code);
                assert_eq!("Client error", api.message);
                assert_eq!(Some("req-1".to_string()), api.request_id);
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_retried_until_success() {
        let server = MockServer::start().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        Mock::given(method("POST"))
            .and(path(URL_PATH))
            .respond_with(move |_req: &Request| {
                if hits_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(500).set_body_string("Server error")
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"any": "ok"}))
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let res = client(&server).post("/someurl", &json!({})).await.unwrap();
        assert_eq!(json!({"any": "ok"}), res);
        assert_eq!(3, hits.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(URL_PATH))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"error": "Server error"})),
            )
            .expect(4) // initial attempt + 3 retries
            .mount(&server)
            .await;

        let err = client(&server).get("/someurl", &[]).await.unwrap_err();
        match err {
            StratusError::Server(api) => {
                assert_eq!(503, api.code);
                assert_eq!("Server error", api.message);
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_too_many_requests_is_retried() {
        let server = MockServer::start().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        Mock::given(method("GET"))
            .and(path(URL_PATH))
            .respond_with(move |_req: &Request| {
                if hits_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(429).insert_header("retry-after", "0")
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"any": "ok"}))
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let res = client(&server).get("/someurl", &[]).await.unwrap();
        assert_eq!(json!({"any": "ok"}), res);
    }

    #[tokio::test]
    async fn test_plain_body_error_message() {
        let server = MockServer::start().await;
        let mut config = test_config(&server.uri());
        config.max_retries = 0;
        Mock::given(method("GET"))
            .and(path(URL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
            .mount(&server)
            .await;

        let err = ApiClient::new(config)
            .unwrap()
            .get("/someurl", &[])
            .await
            .unwrap_err();
        assert_eq!(Some(500), err.code());
        assert!(err.to_string().contains("Server error"));
    }

    #[tokio::test]
    async fn test_gzip_enabled_above_threshold() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(URL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let body = json!({"blob": "a".repeat(2 * GZIP_MIN_BYTES)});
        client(&server).post("/someurl", &body).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        assert_eq!(
            "gzip",
            request.headers.get(CONTENT_ENCODING).unwrap().to_str().unwrap()
        );
        let mut decoded = String::new();
        GzDecoder::new(&request.body[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(body, serde_json::from_str::<Value>(&decoded).unwrap());
    }

    #[tokio::test]
    async fn test_gzip_skipped_below_threshold() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(URL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        client(&server).post("/someurl", &json!({"any": "OK"})).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        assert!(request.headers.get(CONTENT_ENCODING).is_none());
        assert_eq!(
            json!({"any": "OK"}),
            serde_json::from_slice::<Value>(&request.body).unwrap()
        );
    }

    #[tokio::test]
    async fn test_gzip_disabled() {
        let server = MockServer::start().await;
        let mut config = test_config(&server.uri());
        config.gzip = false;
        Mock::given(method("POST"))
            .and(path(URL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let body = json!({"blob": "a".repeat(2 * GZIP_MIN_BYTES)});
        ApiClient::new(config)
            .unwrap()
            .post("/someurl", &body)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        assert!(request.headers.get(CONTENT_ENCODING).is_none());
        assert_eq!(body, serde_json::from_slice::<Value>(&request.body).unwrap());
    }

    #[tokio::test]
    async fn test_api_key_header_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(URL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        client(&server).get("/someurl", &[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            "secret",
            requests[0].headers.get("api-key").unwrap().to_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_network_failure_surfaces_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so connections are refused

        let mut config = test_config(&format!("http://{addr}"));
        config.max_retries = 1;
        let err = ApiClient::new(config)
            .unwrap()
            .get("/someurl", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StratusError::Transport(_)));
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let config = ClientConfig::new("p", "k");
        let client = ApiClient::new(config).unwrap();

        let delay1 = client.backoff_delay(1);
        assert!(delay1.as_millis() >= 750 && delay1.as_millis() <= 1250);

        let delay2 = client.backoff_delay(2);
        assert!(delay2.as_millis() >= 1500 && delay2.as_millis() <= 2500);

        let delay_high = client.backoff_delay(20);
        assert!(delay_high.as_millis() <= 37_500);
    }

    #[test]
    fn test_translate_error_shapes() {
        let err = translate_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 400, "message": "Client error"}}"#,
            None,
        );
        assert_eq!(Some(400), err.code());
        assert!(err.to_string().starts_with("Client error"));

        let err = translate_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "boom"}"#, None);
        assert!(err.to_string().starts_with("boom"));

        let err = translate_error(StatusCode::BAD_GATEWAY, "upstream fell over", None);
        assert!(err.to_string().starts_with("upstream fell over"));
    }
}
