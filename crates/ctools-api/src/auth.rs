// Portal authentication
//
// Cookie-based session login/logout. The login endpoint sets a session
// cookie in the client's jar; subsequent requests use it automatically.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{PortalClient, parse_response};
use crate::error::Error;

impl PortalClient {
    /// Authenticate against the portal as a global administrator.
    ///
    /// `POST /ServicesPortal/api/login` with form fields `j_username` and
    /// `j_password`. On success the session cookie is stored in the
    /// client's cookie jar.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url(["login"])?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .post(url)
            .form(&[
                ("j_username", username),
                ("j_password", password.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        debug!(username, "login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /ServicesPortal/api/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url(["logout"])?;
        debug!("logging out at {}", url);

        let resp = self.http().post(url).send().await?;
        let _: serde_json::Value = parse_response(resp).await?;

        debug!("logout complete");
        Ok(())
    }
}
