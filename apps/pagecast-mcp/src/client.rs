//! # pagecast HTTP Client
//!
//! Wrapper around the pagecast operation API for use by the MCP server.

use serde_json::Value;

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// Cannot reach the pagecast server.
    ConnectionFailed(String),
    /// 429 Too Many Requests.
    RateLimited,
    /// Server returned a 5xx error.
    ServerError(u16, String),
    /// Failed to parse response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to pagecast at {url}"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::ServerError(status, msg) => write!(f, "Server error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// HTTP client that wraps calls to the pagecast API.
#[derive(Clone)]
pub struct PagecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl PagecastClient {
    /// Create a new client pointing at the given pagecast server URL.
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Check status codes and parse JSON.
    ///
    /// 4xx responses still carry a result envelope and are returned as-is.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// POST /api/tools/{name} → run a catalog operation.
    pub async fn execute(&self, name: &str, params: Value) -> Result<Value, ClientError> {
        let path = format!("/api/tools/{name}");
        let req = self.request(reqwest::Method::POST, &path).json(&params);
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    /// GET /api/status → observer and page counts.
    pub async fn status(&self) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/status");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}
