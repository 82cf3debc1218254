// Portal API response types
//
// Fields use `#[serde(default)]` liberally because the portal and the
// filers it proxies differ in field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Tenants ──────────────────────────────────────────────────────────

/// A tenant portal, as returned by `GET portals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device inventory entry, as returned by `GET portals/{tenant}/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub name: String,
    #[serde(default, rename = "deviceConnectionStatus")]
    pub connection_status: ConnectionStatus,
    #[serde(default, rename = "deviceReportedStatus")]
    pub reported_status: Option<ReportedStatus>,
}

impl DeviceSummary {
    pub fn is_connected(&self) -> bool {
        self.connection_status.connected
    }

    /// Hostname the device last reported to the portal.
    pub fn hostname(&self) -> Option<&str> {
        self.reported_status
            .as_ref()
            .and_then(|s| s.config.as_ref())
            .and_then(|c| c.hostname.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportedStatus {
    #[serde(default)]
    pub config: Option<ReportedConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportedConfig {
    #[serde(default)]
    pub hostname: Option<String>,
}

// ── Remote filer payloads ────────────────────────────────────────────

/// Cloud sync engine status from `proc/cloudsync/serviceStatus`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncServiceStatus {
    /// Engine state identifier, e.g. `"Synced"` or `"Scanning"`.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uploading_files: Option<u64>,
    #[serde(default)]
    pub scanning_files: Option<u64>,
    #[serde(default)]
    pub self_verification_scanning_files: Option<u64>,
}

/// Network port status from `status/network/ports/{n}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkPortStatus {
    #[serde(default)]
    pub ip: Option<IpStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpStatus {
    #[serde(default)]
    pub address: Option<String>,
}

/// Performance monitor from `proc/perfMonitor`: the current sample plus
/// the retained history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerfMonitor {
    #[serde(default)]
    pub current: Option<PerfSample>,
    #[serde(default)]
    pub samples: Vec<PerfSample>,
}

/// One CPU / memory utilisation sample, in percent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PerfSample {
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default, rename = "memUsage")]
    pub mem_usage: Option<f64>,
}

impl PerfMonitor {
    /// Highest CPU utilisation across the retained samples.
    pub fn max_cpu(&self) -> Option<f64> {
        self.samples.iter().filter_map(|s| s.cpu).reduce(f64::max)
    }

    /// Highest memory utilisation across the retained samples.
    pub fn max_memory(&self) -> Option<f64> {
        self.samples.iter().filter_map(|s| s.mem_usage).reduce(f64::max)
    }
}

// ── Requests ─────────────────────────────────────────────────────────

/// Body of a remote action call: `{"name": "<action>", "param": ...}`.
#[derive(Debug, Serialize)]
pub(crate) struct ActionRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<serde_json::Value>,
}
