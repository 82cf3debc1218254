// ── Fleet domain types ──

use serde::{Deserialize, Serialize};

use ctools_api::{DeviceSummary, Portal};

/// Placeholder written to a report cell whose value could not be read.
pub const SENTINEL: &str = "Not Applicable";

/// Number of columns in the status report.
pub const STATUS_COLUMNS: usize = 20;

/// Status report header, in column order.
pub const STATUS_HEADER: [&str; STATUS_COLUMNS] = [
    "Gateway",
    "CloudSync Status",
    "selfScanIntervalInHours",
    "FilesInUploadQueue",
    "scanningFiles",
    "selfVerificationscanningFiles",
    "MetaLogsSetting",
    "MetaLogMaxSize",
    "MetaLogMaxFiles",
    "CurrentFirmware",
    "License",
    "EvictionPercentage",
    "CurrentVolumeStorage",
    "IP Config",
    "Alerts",
    "TimeServer",
    "Uptime",
    "CPU/Memory",
    "MaxCPU",
    "MaxMemory",
];

/// A tenant portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub display_name: Option<String>,
}

impl From<Portal> for Tenant {
    fn from(p: Portal) -> Self {
        Self {
            name: p.name,
            display_name: p.display_name,
        }
    }
}

/// A filer registered under a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filer {
    pub tenant: String,
    pub name: String,
    pub connected: bool,
    pub hostname: Option<String>,
}

impl Filer {
    pub(crate) fn from_summary(tenant: &str, d: DeviceSummary) -> Self {
        Self {
            tenant: tenant.to_owned(),
            connected: d.is_connected(),
            hostname: d.hostname().map(str::to_owned),
            name: d.name,
        }
    }
}

/// Operator-supplied `(tenant, device)` pair naming a single filer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub tenant: String,
    pub name: String,
}

impl DeviceRef {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.tenant, self.name)
    }
}

/// One filer's status, flattened into report cells.
///
/// Every field is already rendered; unreadable optional fields hold
/// [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub gateway: String,
    pub sync_status: String,
    pub scan_interval_hours: String,
    pub upload_queue: String,
    pub scanning_files: String,
    pub verification_scanning_files: String,
    pub log_settings: String,
    pub log_max_size_mb: String,
    pub log_max_files: String,
    pub firmware: String,
    pub license: String,
    pub eviction_percentage: String,
    pub volume_storage: String,
    pub ip_address: String,
    pub alerts: String,
    pub time_server: String,
    pub uptime: String,
    pub cpu_memory: String,
    pub max_cpu: String,
    pub max_memory: String,
}

impl StatusRow {
    /// Row for `gateway` with every other column set to [`SENTINEL`].
    pub fn unavailable(gateway: impl Into<String>) -> Self {
        let na = || SENTINEL.to_owned();
        Self {
            gateway: gateway.into(),
            sync_status: na(),
            scan_interval_hours: na(),
            upload_queue: na(),
            scanning_files: na(),
            verification_scanning_files: na(),
            log_settings: na(),
            log_max_size_mb: na(),
            log_max_files: na(),
            firmware: na(),
            license: na(),
            eviction_percentage: na(),
            volume_storage: na(),
            ip_address: na(),
            alerts: na(),
            time_server: na(),
            uptime: na(),
            cpu_memory: na(),
            max_cpu: na(),
            max_memory: na(),
        }
    }

    /// Cells in [`STATUS_HEADER`] order.
    pub fn into_record(self) -> [String; STATUS_COLUMNS] {
        [
            self.gateway,
            self.sync_status,
            self.scan_interval_hours,
            self.upload_queue,
            self.scanning_files,
            self.verification_scanning_files,
            self.log_settings,
            self.log_max_size_mb,
            self.log_max_files,
            self.firmware,
            self.license,
            self.eviction_percentage,
            self.volume_storage,
            self.ip_address,
            self.alerts,
            self.time_server,
            self.uptime,
            self.cpu_memory,
            self.max_cpu,
            self.max_memory,
        ]
    }
}
