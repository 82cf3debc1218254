// Tenant (portal) endpoints
//
// Tenant listing is global-admin scoped: `GET /ServicesPortal/api/portals`.

use tracing::debug;

use crate::client::PortalClient;
use crate::error::Error;
use crate::models::Portal;

impl PortalClient {
    /// List all tenant portals visible to the authenticated administrator.
    ///
    /// `GET /ServicesPortal/api/portals`
    pub async fn list_portals(&self) -> Result<Vec<Portal>, Error> {
        let url = self.api_url(["portals"])?;
        debug!("listing tenants");
        self.get(url).await
    }

    /// Fetch a single tenant by name.
    ///
    /// `GET /ServicesPortal/api/portals/{tenant}` -- `Error::NotFound` when
    /// no such tenant exists.
    pub async fn get_portal(&self, tenant: &str) -> Result<Portal, Error> {
        let url = self.api_url(["portals", tenant])?;
        debug!(tenant, "fetching tenant");
        self.get(url).await
    }
}
