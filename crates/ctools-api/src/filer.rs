// Typed Edge Filer endpoints
//
// Thin wrappers over `RemoteDevice` for the remote reads and actions the
// maintenance tasks issue. Paths are relative to the device's remote root.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{NetworkPortStatus, PerfMonitor, SyncServiceStatus};
use crate::remote::RemoteDevice;

const DEVICE_CONFIG: &str = "config/device";
const CLOUDSYNC_CONFIG: &str = "config/cloudsync";

impl RemoteDevice<'_> {
    // ── Status reads ─────────────────────────────────────────────────

    /// `GET proc/cloudsync/serviceStatus`
    pub async fn sync_status(&self) -> Result<SyncServiceStatus, Error> {
        self.get("proc/cloudsync/serviceStatus").await
    }

    /// `GET status/network/ports/{port}`
    pub async fn network_port_status(&self, port: u32) -> Result<NetworkPortStatus, Error> {
        self.get(&format!("status/network/ports/{port}")).await
    }

    /// `GET proc/perfMonitor`
    pub async fn perf_monitor(&self) -> Result<PerfMonitor, Error> {
        self.get("proc/perfMonitor").await
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Run a shell command through the filer's debug CLI and return its output.
    ///
    /// Action `debugCmd` on `config/device`.
    pub async fn run_cli_command(&self, command: &str) -> Result<String, Error> {
        debug!(tenant = self.tenant(), device = self.name(), command, "running remote command");
        let out: serde_json::Value = self
            .execute(DEVICE_CONFIG, "debugCmd", Some(json!(command)))
            .await?;
        Ok(match out {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Enable the telnet daemon. Action `startTelnetd` on `config/device`.
    pub async fn enable_telnet(&self, code: Option<&str>) -> Result<(), Error> {
        debug!(tenant = self.tenant(), device = self.name(), "enabling telnet");
        let param = code.map(|c| json!({ "code": c }));
        let _: serde_json::Value = self.execute(DEVICE_CONFIG, "startTelnetd", param).await?;
        Ok(())
    }

    /// Start the SSH daemon, optionally installing a public key.
    ///
    /// Action `startSSHD` on `config/device`.
    pub async fn start_ssh(&self, public_key: Option<&str>) -> Result<(), Error> {
        debug!(
            tenant = self.tenant(),
            device = self.name(),
            with_key = public_key.is_some(),
            "starting sshd"
        );
        let param = public_key.map(|k| json!({ "publicKey": k }));
        let _: serde_json::Value = self.execute(DEVICE_CONFIG, "startSSHD", param).await?;
        Ok(())
    }

    /// Stop the SSH daemon. Action `stopSSHD` on `config/device`.
    pub async fn stop_ssh(&self) -> Result<(), Error> {
        debug!(tenant = self.tenant(), device = self.name(), "stopping sshd");
        let _: serde_json::Value = self.execute(DEVICE_CONFIG, "stopSSHD", None).await?;
        Ok(())
    }

    /// Suspend cloud sync. Action `suspend` on `config/cloudsync`.
    pub async fn suspend_sync(&self) -> Result<(), Error> {
        debug!(tenant = self.tenant(), device = self.name(), "suspending sync");
        let _: serde_json::Value = self.execute(CLOUDSYNC_CONFIG, "suspend", None).await?;
        Ok(())
    }

    /// Resume cloud sync. Action `unsuspend` on `config/cloudsync`.
    pub async fn unsuspend_sync(&self) -> Result<(), Error> {
        debug!(tenant = self.tenant(), device = self.name(), "unsuspending sync");
        let _: serde_json::Value = self.execute(CLOUDSYNC_CONFIG, "unsuspend", None).await?;
        Ok(())
    }

    /// Set a local user's password.
    ///
    /// `PUT config/auth/users/{username}/password` with the password as a
    /// JSON string.
    pub async fn set_user_password(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        debug!(
            tenant = self.tenant(),
            device = self.name(),
            username,
            "resetting local user password"
        );
        self.put(
            &format!("config/auth/users/{username}/password"),
            &password.expose_secret(),
        )
        .await
    }
}
