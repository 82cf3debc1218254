// ── Core error types ──
//
// User-facing errors from ctools-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<ctools_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::report::ReportError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to portal at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Fleet errors ─────────────────────────────────────────────────
    #[error("Tenant not found: {name}")]
    TenantNotFound { name: String },

    #[error("Device '{name}' not found in {scope}")]
    DeviceNotFound { name: String, scope: String },

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied for {path}")]
    PermissionDenied { path: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Output ───────────────────────────────────────────────────────
    #[error(transparent)]
    Report(#[from] ReportError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `DeviceNotFound` scoped to one tenant.
    pub(crate) fn device_in_tenant(name: &str, tenant: &str) -> Self {
        Self::DeviceNotFound {
            name: name.to_owned(),
            scope: format!("tenant '{tenant}'"),
        }
    }

    /// Returns `true` if the portal session can no longer be used, so
    /// continuing a fleet scan would only repeat the failure.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::ConnectionFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ctools_api::Error> for CoreError {
    fn from(err: ctools_api::Error) -> Self {
        match err {
            ctools_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            ctools_api::Error::Forbidden { path } => CoreError::PermissionDenied { path },
            ctools_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ctools_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ctools_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Portal address cannot be used as a base URL: {url}"),
            },
            ctools_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ctools_api::Error::NotFound { path } => CoreError::NotFound { path },
            ctools_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ctools_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
