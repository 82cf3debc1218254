// Device inventory endpoints
//
// Devices are always addressed through their tenant:
// `/ServicesPortal/api/portals/{tenant}/devices[/{name}]`.

use tracing::debug;

use crate::client::PortalClient;
use crate::error::Error;
use crate::models::DeviceSummary;

/// Fields requested from the device inventory listing.
const DEVICE_INCLUDE: &str = "deviceConnectionStatus.connected,deviceReportedStatus.config.hostname";

impl PortalClient {
    /// List every device registered under a tenant, connected or not.
    ///
    /// `GET /ServicesPortal/api/portals/{tenant}/devices?include=...`
    pub async fn list_devices(&self, tenant: &str) -> Result<Vec<DeviceSummary>, Error> {
        let mut url = self.api_url(["portals", tenant, "devices"])?;
        url.query_pairs_mut().append_pair("include", DEVICE_INCLUDE);
        debug!(tenant, "listing devices");
        self.get(url).await
    }

    /// Fetch a single device by name within a tenant.
    ///
    /// `Error::NotFound` when the device does not exist.
    pub async fn get_device(&self, tenant: &str, device: &str) -> Result<DeviceSummary, Error> {
        let mut url = self.api_url(["portals", tenant, "devices", device])?;
        url.query_pairs_mut().append_pair("include", DEVICE_INCLUDE);
        debug!(tenant, device, "fetching device");
        self.get(url).await
    }
}
