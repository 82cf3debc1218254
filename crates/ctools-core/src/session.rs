// ── Administrative session ──
//
// Login/logout lifecycle against the portal. A `Session` owns the
// authenticated HTTP client; fleet queries and remote calls borrow it.

use tracing::{debug, info, warn};
use url::Url;

use ctools_api::transport::{TlsMode, TransportConfig};
use ctools_api::PortalClient;

use crate::config::{SessionConfig, TlsVerification};
use crate::error::CoreError;

/// An authenticated global-administrator session.
///
/// Created by [`login`](Self::login) and released by
/// [`logout`](Self::logout), which consumes the session so it cannot be
/// called twice. Dropping a session that was never logged out leaves it
/// open on the portal until it expires; that is logged as a warning.
pub struct Session {
    client: PortalClient,
    url: Url,
    username: String,
    tls: TlsVerification,
    open: bool,
}

impl Session {
    /// Authenticate against the portal.
    ///
    /// Fails with [`CoreError::AuthenticationFailed`] when the credentials
    /// are rejected and [`CoreError::ConnectionFailed`] when the portal is
    /// unreachable.
    pub async fn login(config: &SessionConfig) -> Result<Self, CoreError> {
        if config.tls == TlsVerification::DangerAcceptInvalid {
            warn!(portal = %config.url, "certificate validation disabled by operator");
        }

        let transport = build_transport(config);
        let client = PortalClient::new(config.url.clone(), &transport)?;
        client.login(&config.username, &config.password).await?;

        info!(portal = %config.url, username = %config.username, "logged in to portal");

        Ok(Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            tls: config.tls.clone(),
            open: true,
        })
    }

    /// End the session on the portal.
    pub async fn logout(mut self) -> Result<(), CoreError> {
        self.open = false;
        self.client.logout().await?;
        info!(portal = %self.url, "logged out of portal");
        Ok(())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn client(&self) -> &PortalClient {
        &self.client
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.open {
            warn!(portal = %self.url, "session dropped without logout");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("tls", &self.tls)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

fn build_transport(config: &SessionConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    debug!(?tls, timeout = ?config.timeout, "building portal transport");

    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
