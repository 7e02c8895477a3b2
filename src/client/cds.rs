//! CDS client module
//!
//! Provides `CdsClient`, the shared request primitive every import, push and
//! pull operation goes through.

use super::{Auth, ClientError, RequestModifier};
use crate::config::CdsConfig;
use eyre::{Context, Result, eyre};
use owo_colors::OwoColorize;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// Percent-encode a caller supplied value for use as one URL path segment.
///
/// `/`, `?` and `#` are encoded so the value cannot change the route.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Raw outcome of a request: status code, response headers and body bytes.
///
/// Returned for every HTTP status; deciding what a 4xx or 5xx means is left
/// to the calling operation.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Fail with [`ClientError::HttpStatus`] when the status is 400 or above
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_error() {
            log::debug!(
                "{} {}",
                self.status.red(),
                String::from_utf8_lossy(&self.body)
            );
            return Err(ClientError::HttpStatus(self.status).into());
        }
        Ok(self)
    }

    /// Value of a response header, or `None` when absent, empty or not UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}

/// CDS API client.
///
/// Holds the HTTP client, base URL and authentication headers. Cloning is
/// cheap and clones share the underlying connection pool.
///
/// # Example
/// ```no_run
/// use cds_client::client::{Auth, CdsClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("http://localhost:8081")?;
/// let client = CdsClient::try_new(url, Auth::Token("my-token".to_string()))?;
///
/// let yaml = std::fs::read("my-app.yml")?;
/// let messages = client.application_import("PROJ", &yaml, "yml", false).await?;
/// for message in messages {
///     println!("{}", message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CdsClient {
    client: Client,
    url: Url,
}

impl CdsClient {
    /// Create a new CdsClient from a base URL and Auth.
    ///
    /// # Errors
    /// Returns an error if the auth header is not a valid header value or
    /// the HTTP client cannot be built
    pub fn try_new(url: Url, auth: Auth) -> Result<Self> {
        Self::build(url, auth, false, None)
    }

    /// Create a new CdsClient from a loaded configuration.
    pub fn from_config(config: &CdsConfig) -> Result<Self> {
        let url = Url::parse(&config.host)
            .with_context(|| format!("Invalid CDS API URL: {}", config.host))?;
        Self::build(
            url,
            config.auth(),
            config.insecure_skip_verify,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(url: Url, auth: Auth, insecure: bool, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("cds-client/", env!("CARGO_PKG_VERSION"))),
        );
        auth.apply(&mut headers)?;
        log::debug!("Using {} authentication for {}", auth, url);

        let mut builder = Client::builder().default_headers(headers);
        if insecure {
            log::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, url })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve an API path against the base URL, keeping any base path prefix.
    ///
    /// Segments interpolated into `path` must already be encoded with
    /// [`path_segment`].
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.url.as_str().trim_end_matches('/');
        let path = path.strip_prefix('/').unwrap_or(path);
        let joined = format!("{}/{}", base, path);
        Url::parse(&joined).with_context(|| format!("Invalid request URL: {}", joined))
    }

    /// Verify the connection to the API.
    ///
    /// Makes a GET request to /mon/version and returns the reported version.
    pub async fn ping(&self) -> Result<String> {
        let response = self
            .request(Method::GET, "/mon/version", None, &[])
            .await?
            .error_for_status()?;
        let value: serde_json::Value = serde_json::from_slice(&response.body)
            .with_context(|| "Failed to decode version response")?;
        Ok(value
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string())
    }

    /// Send a request to a given path.
    ///
    /// A query string in `path` is sent as written. Query modifiers are
    /// appended to it, encoded, in order.
    ///
    /// # Errors
    /// Only transport failures and invalid modifiers are errors; any HTTP
    /// status is returned in the [`ApiResponse`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
        modifiers: &[RequestModifier],
    ) -> Result<ApiResponse> {
        let mut headers = HeaderMap::new();
        let mut query = Vec::new();
        for modifier in modifiers {
            modifier.apply(&mut headers, &mut query)?;
        }

        log::debug!("{} {}", method.as_str().green(), path);
        log::trace!("Headers: {:?}, query: {:?}", headers, query);

        let mut builder = self
            .client
            .request(method, self.endpoint(path)?)
            .headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            log::trace!("Sending request with {} byte body", body.len());
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| eyre!("Failed to read response body: {}", e))?
            .to_vec();
        log::trace!("{} with {} byte body", status, body.len());

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Display for CdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
