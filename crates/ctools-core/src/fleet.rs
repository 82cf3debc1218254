// ── Fleet enumeration ──
//
// Tenant listing, tenant-scoped filer listing and single-device
// resolution. The tenant is always passed explicitly: nothing here
// mutates the session.

use tracing::{debug, warn};

use ctools_api::RemoteDevice;

use crate::error::CoreError;
use crate::model::{DeviceRef, Filer, Tenant};
use crate::session::Session;

/// A session bound to one tenant for device queries.
///
/// Returned by [`Session::select_tenant`]. Several scopes may coexist;
/// selecting one tenant never affects another.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope<'a> {
    session: &'a Session,
    tenant: &'a Tenant,
}

impl<'a> TenantScope<'a> {
    pub fn tenant(&self) -> &'a Tenant {
        self.tenant
    }

    /// Connected filers of this tenant.
    pub async fn connected_filers(&self) -> Result<Vec<Filer>, CoreError> {
        self.session.list_connected_filers(self.tenant).await
    }
}

impl Session {
    /// All tenants visible to the administrator. Fetched fresh on every call.
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, CoreError> {
        let portals = self.client().list_portals().await?;
        debug!(count = portals.len(), "listed tenants");
        Ok(portals.into_iter().map(Tenant::from).collect())
    }

    /// Look up one tenant by name.
    pub async fn tenant(&self, name: &str) -> Result<Tenant, CoreError> {
        match self.client().get_portal(name).await {
            Ok(portal) => Ok(portal.into()),
            Err(e) if e.is_not_found() => Err(CoreError::TenantNotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Scope subsequent device queries to `tenant`.
    pub fn select_tenant<'a>(&'a self, tenant: &'a Tenant) -> TenantScope<'a> {
        debug!(tenant = %tenant.name, "selected tenant");
        TenantScope {
            session: self,
            tenant,
        }
    }

    /// Every filer of `tenant` whose connectivity flag is set.
    pub async fn list_connected_filers(&self, tenant: &Tenant) -> Result<Vec<Filer>, CoreError> {
        let devices = self.client().list_devices(&tenant.name).await?;
        let total = devices.len();
        let connected: Vec<Filer> = devices
            .into_iter()
            .map(|d| Filer::from_summary(&tenant.name, d))
            .filter(|f| f.connected)
            .collect();
        debug!(
            tenant = %tenant.name,
            total,
            connected = connected.len(),
            "listed filers"
        );
        Ok(connected)
    }

    /// Connected filers across every tenant, scanned one tenant at a time.
    pub async fn all_connected_filers(&self) -> Result<Vec<Filer>, CoreError> {
        let mut filers = Vec::new();
        for tenant in self.list_tenants().await? {
            filers.extend(self.list_connected_filers(&tenant).await?);
        }
        Ok(filers)
    }

    /// Resolve a named device within a named tenant.
    ///
    /// Fails with [`CoreError::TenantNotFound`] or
    /// [`CoreError::DeviceNotFound`]; nothing is sent to the device.
    pub async fn resolve_filer(&self, device: &DeviceRef) -> Result<Filer, CoreError> {
        let tenant = self.tenant(&device.tenant).await?;

        let summary = match self.client().get_device(&tenant.name, &device.name).await {
            Ok(summary) => summary,
            Err(e) if e.is_not_found() => {
                return Err(CoreError::device_in_tenant(&device.name, &tenant.name));
            }
            Err(e) => return Err(e.into()),
        };

        let filer = Filer::from_summary(&tenant.name, summary);
        if !filer.connected {
            warn!(device = %device, "device is not connected to the portal");
        }
        Ok(filer)
    }

    /// Find a connected filer by name in any tenant. First match wins.
    pub async fn find_connected_filer(&self, name: &str) -> Result<Filer, CoreError> {
        for tenant in self.list_tenants().await? {
            let found = self
                .list_connected_filers(&tenant)
                .await?
                .into_iter()
                .find(|f| f.name == name);
            if let Some(filer) = found {
                debug!(tenant = %tenant.name, device = name, "found connected filer");
                return Ok(filer);
            }
        }
        Err(CoreError::DeviceNotFound {
            name: name.to_owned(),
            scope: "any tenant (connected filers)".into(),
        })
    }

    /// Address a filer for remote calls.
    pub fn remote<'a>(&'a self, filer: &'a Filer) -> RemoteDevice<'a> {
        self.client().remote(&filer.tenant, &filer.name)
    }
}
