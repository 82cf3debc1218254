// Remote device access
//
// The portal proxies configuration reads and actions to connected
// filers under `portals/{tenant}/devices/{device}/remote/{path}`:
// GET reads a value, POST executes a named action, PUT writes a value.

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::PortalClient;
use crate::error::Error;
use crate::models::ActionRequest;

/// Handle for issuing remote calls to one device through the portal.
///
/// Cheap to create; borrows the authenticated [`PortalClient`].
#[derive(Clone, Copy)]
pub struct RemoteDevice<'a> {
    client: &'a PortalClient,
    tenant: &'a str,
    device: &'a str,
}

impl PortalClient {
    /// Address a device for remote calls. Does not contact the portal.
    pub fn remote<'a>(&'a self, tenant: &'a str, device: &'a str) -> RemoteDevice<'a> {
        RemoteDevice {
            client: self,
            tenant,
            device,
        }
    }
}

impl<'a> RemoteDevice<'a> {
    pub fn tenant(&self) -> &'a str {
        self.tenant
    }

    pub fn name(&self) -> &'a str {
        self.device
    }

    /// `{api}/portals/{tenant}/devices/{device}/remote/{path...}`
    fn url(&self, path: &str) -> Result<Url, Error> {
        let head = ["portals", self.tenant, "devices", self.device, "remote"];
        let tail = path.split('/').filter(|s| !s.is_empty());
        self.client.api_url(head.into_iter().chain(tail))
    }

    /// Read a configuration or status value, e.g. `status/device/runningFirmware`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        self.client.get(url).await
    }

    /// Read a value without assuming its shape.
    pub async fn get_value(&self, path: &str) -> Result<serde_json::Value, Error> {
        self.get(path).await
    }

    /// Execute a named action on a configuration node.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        action: &str,
        param: Option<serde_json::Value>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let body = ActionRequest {
            name: action,
            param,
        };
        self.client.post(url, &body).await
    }

    /// Overwrite a configuration value.
    pub async fn put(&self, path: &str, value: &(impl Serialize + Sync)) -> Result<(), Error> {
        let url = self.url(path)?;
        let _: serde_json::Value = self.client.put(url, value).await?;
        Ok(())
    }
}
