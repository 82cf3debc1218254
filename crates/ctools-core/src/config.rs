// ── Runtime session configuration ──
//
// These types describe *how* to reach the portal. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `SessionConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
///
/// Strict by default; accepting invalid certificates is an explicit opt-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed portals).
    DangerAcceptInvalid,
}

/// Everything needed to open an administrative session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Portal URL (e.g., `https://portal.example.com`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout, enforced by the HTTP transport.
    pub timeout: Duration,
}

/// Turn an operator-supplied portal address into a URL.
///
/// Accepts full URLs as well as a bare IP, hostname or FQDN (optionally
/// with a port), which are assumed to be HTTPS.
pub fn portal_url(address: &str) -> Result<Url, CoreError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(CoreError::Config {
            message: "portal address is empty".into(),
        });
    }

    let candidate = if address.contains("://") {
        address.to_owned()
    } else {
        format!("https://{address}")
    };

    let url = Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid portal address '{address}': {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::Config {
            message: format!("unsupported scheme '{other}' in portal address '{address}'"),
        }),
    }
}
