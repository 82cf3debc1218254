// ctools-api: Async Rust client for the CTERA Portal API (tenants, devices, remote filer calls)

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod filer;
pub mod models;
pub mod portals;
pub mod remote;
pub mod transport;

pub use client::PortalClient;
pub use error::Error;
pub use models::{DeviceSummary, PerfMonitor, PerfSample, Portal, SyncServiceStatus};
pub use remote::RemoteDevice;
pub use transport::{TlsMode, TransportConfig};
