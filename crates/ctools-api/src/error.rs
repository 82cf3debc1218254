use thiserror::Error;

/// Top-level error type for the `ctools-api` crate.
///
/// Covers every failure mode of the portal API surface: authentication,
/// transport, HTTP status errors and payload decoding. `ctools-core` maps
/// these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the session cookie is no longer accepted.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Authenticated, but the portal refused access to this resource.
    #[error("Access denied to {path}")]
    Forbidden { path: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The portal address cannot carry a path (e.g. `mailto:` style URLs).
    #[error("Portal address cannot be used as a base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The requested object does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success response from the portal or the remote device.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the remote side answered, but the requested field
    /// is missing, renamed, or not in the expected shape.
    ///
    /// Transport and authentication failures are never "unavailable" --
    /// they mean the device or session itself is unreachable.
    pub fn is_field_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api { .. } | Self::Deserialization { .. }
        )
    }
}
