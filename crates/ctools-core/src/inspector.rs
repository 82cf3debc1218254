// ── Filer inspector ──
//
// Builds one `StatusRow` from a fresh set of remote reads. Every column
// goes through the field resolver, so a missing or renamed field only
// degrades that column to the sentinel; transport and session failures
// abort the row and surface to the caller.

use tracing::debug;

use ctools_api::{PerfMonitor, PerfSample, RemoteDevice, SyncServiceStatus};

use crate::error::CoreError;
use crate::model::{Filer, StatusRow};
use crate::resolver::{FieldValue, Source, optional, resolve};
use crate::session::Session;

// ── Column sources ───────────────────────────────────────────────────

const SCAN_INTERVAL: &[Source] = &[Source::Path(
    "config/cloudsync/selfScanVerificationIntervalInHours",
)];
const LOG_SETTINGS: &[Source] = &[
    Source::Cli("dbg le"),
    Source::Path("config/logging/general/debugLevel"),
];
const LOG_MAX_SIZE: &[Source] = &[
    Source::Path("config/logging/metalog/maxFileSizeMB"),
    Source::Path("config/logging/log2File/maxFileSizeMB"),
];
const LOG_MAX_FILES: &[Source] = &[
    Source::Path("config/logging/metalog/maxfiles"),
    Source::Path("config/logging/log2File/maxfiles"),
];
const FIRMWARE: &[Source] = &[Source::Path("status/device/runningFirmware")];
const LICENSE: &[Source] = &[Source::Path("config/device/activeLicenseType")];
const EVICTION: &[Source] = &[Source::Path(
    "config/cloudsync/cloudExtender/storageThresholdPercentTrigger",
)];
const VOLUME_STORAGE: &[Source] = &[Source::Path("proc/storage/summary")];
const ALERTS: &[Source] = &[Source::Path("config/logging/alert")];
const TIME_SERVER: &[Source] = &[Source::Path("config/time/NTPServer")];
const UPTIME: &[Source] = &[Source::Path("proc/time/uptime")];

/// Network port whose address is reported in the "IP Config" column.
const PRIMARY_PORT: u32 = 0;

/// Collect a status snapshot of one filer.
pub async fn snapshot(session: &Session, filer: &Filer) -> Result<StatusRow, CoreError> {
    let device = session.remote(filer);
    debug!(
        tenant = %filer.tenant,
        filer = %filer.name,
        hostname = ?filer.hostname,
        "collecting status"
    );

    let sync = optional(device.sync_status().await)?;
    let perf = optional(device.perf_monitor().await)?;
    let ip = optional(device.network_port_status(PRIMARY_PORT).await)?
        .and_then(|p| p.ip)
        .and_then(|ip| ip.address);

    let sync = sync.as_ref();
    Ok(StatusRow {
        gateway: filer.name.clone(),
        sync_status: cell(sync.and_then(|s| s.id.clone())),
        scan_interval_hours: field(&device, SCAN_INTERVAL).await?,
        upload_queue: count(sync, |s| s.uploading_files),
        scanning_files: count(sync, |s| s.scanning_files),
        verification_scanning_files: count(sync, |s| s.self_verification_scanning_files),
        log_settings: field(&device, LOG_SETTINGS).await?,
        log_max_size_mb: field(&device, LOG_MAX_SIZE).await?,
        log_max_files: field(&device, LOG_MAX_FILES).await?,
        firmware: field(&device, FIRMWARE).await?,
        license: field(&device, LICENSE).await?,
        eviction_percentage: field(&device, EVICTION).await?,
        volume_storage: field(&device, VOLUME_STORAGE).await?,
        ip_address: cell(ip),
        alerts: field(&device, ALERTS).await?,
        time_server: field(&device, TIME_SERVER).await?,
        uptime: field(&device, UPTIME).await?,
        cpu_memory: cell(perf.as_ref().and_then(|p| p.current).and_then(current_usage)),
        max_cpu: cell(perf.as_ref().and_then(PerfMonitor::max_cpu).map(percent)),
        max_memory: cell(perf.as_ref().and_then(PerfMonitor::max_memory).map(percent)),
    })
}

async fn field(device: &RemoteDevice<'_>, sources: &[Source]) -> Result<String, CoreError> {
    Ok(resolve(device, sources).await?.into_cell())
}

fn cell(value: Option<String>) -> String {
    FieldValue::from(value).into_cell()
}

fn count(
    sync: Option<&SyncServiceStatus>,
    get: impl Fn(&SyncServiceStatus) -> Option<u64>,
) -> String {
    cell(sync.and_then(get).map(|n| n.to_string()))
}

fn percent(value: f64) -> String {
    format!("{value}%")
}

fn current_usage(sample: PerfSample) -> Option<String> {
    let cpu = sample.cpu?;
    let mem = sample.mem_usage?;
    Some(format!("CPU: {}, Memory: {}", percent(cpu), percent(mem)))
}
