// Portal HTTP client
//
// Wraps `reqwest::Client` with portal URL construction and response
// decoding. Endpoint groups (auth, portals, devices, remote filer calls)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Path segments of the portal's REST root, below the base URL.
const API_ROOT: [&str; 2] = ["ServicesPortal", "api"];

/// Longest body excerpt carried inside error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the portal's administration API.
///
/// Holds the session cookie jar once [`login`](Self::login) succeeds; every
/// subsequent request is authenticated through it.
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PortalClient {
    /// Create a new portal client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a portal client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/ServicesPortal/api/{segments...}`.
    ///
    /// Each segment is percent-encoded individually, so tenant and device
    /// names containing spaces or slashes stay inside their own segment.
    pub(crate) fn api_url<I>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(API_ROOT)
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and decode the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self.http.put(url).json(body).send().await?;
        parse_response(resp).await
    }
}

/// Map the HTTP status onto an [`Error`], then decode the JSON body.
///
/// An empty body decodes as JSON `null`, so action endpoints that answer
/// with no content can be read as `serde_json::Value`.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    let path = resp.url().path().to_owned();

    match status {
        StatusCode::UNAUTHORIZED => {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }
        StatusCode::FORBIDDEN => return Err(Error::Forbidden { path }),
        StatusCode::NOT_FOUND => return Err(Error::NotFound { path }),
        s if !s.is_success() => {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: s.as_u16(),
                message: preview(&body),
            });
        }
        _ => {}
    }

    let body = resp.text().await?;
    trace!(path, bytes = body.len(), "response body received");

    let text = if body.trim().is_empty() { "null" } else { &body };
    serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
