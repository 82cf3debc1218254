// ── Task dispatch ──
//
// One invocation runs exactly one task against an authenticated session.
// `dispatch` owns the session and logs it out on every path, success or
// failure.

mod command;
mod status;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::model::{DeviceRef, Filer};
use crate::report::OutputMode;
use crate::session::Session;

/// Which tenants a status scan covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TenantSelector {
    #[default]
    All,
    Only(String),
}

/// Which filers a remote command runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// The first connected filer with this name, searched across tenants.
    Device(String),
    AllFilers,
}

impl CommandTarget {
    /// Build a target from the command-line switches. A named device wins
    /// over `all`; asking for neither is rejected.
    pub fn from_flags(device: Option<String>, all: bool) -> Result<Self, CoreError> {
        match (device, all) {
            (Some(name), _) => Ok(Self::Device(name)),
            (None, true) => Ok(Self::AllFilers),
            (None, false) => Err(CoreError::ValidationFailed {
                message: "run-cmd needs a target: name a device or select all filers".into(),
            }),
        }
    }
}

/// A maintenance task.
#[derive(Debug, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Task {
    /// Write a CSV status report of connected filers.
    Status {
        output: PathBuf,
        mode: OutputMode,
        tenants: TenantSelector,
    },
    /// Run a debug-CLI command on one or all connected filers.
    #[strum(serialize = "run-cmd")]
    RunCommand {
        command: String,
        target: CommandTarget,
    },
    EnableTelnet {
        device: DeviceRef,
        code: Option<String>,
    },
    EnableSsh {
        device: DeviceRef,
        public_key: Option<String>,
    },
    DisableSsh {
        device: DeviceRef,
    },
    SuspendSync {
        device: DeviceRef,
    },
    UnsuspendSync {
        device: DeviceRef,
    },
    ResetPassword {
        device: DeviceRef,
        username: String,
        password: SecretString,
    },
}

/// Result of a successful task.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutcome {
    Status(StatusSummary),
    Commands { reports: Vec<CommandReport> },
    Applied { action: &'static str, device: DeviceRef },
}

/// Summary of a status scan.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub path: PathBuf,
    pub tenants_scanned: usize,
    pub rows_written: usize,
    /// Filers whose row was dropped after a read failure.
    pub skipped: Vec<SkippedFiler>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFiler {
    pub tenant: String,
    pub filer: String,
    pub reason: String,
}

/// Output of a remote command on one filer.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub tenant: String,
    pub filer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReport {
    fn success(filer: &Filer, output: String) -> Self {
        Self {
            tenant: filer.tenant.clone(),
            filer: filer.name.clone(),
            output: Some(output),
            error: None,
        }
    }

    fn failure(filer: &Filer, error: &CoreError) -> Self {
        Self {
            tenant: filer.tenant.clone(),
            filer: filer.name.clone(),
            output: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `task` and log the session out afterwards.
///
/// A logout failure is logged and never replaces the task's own result.
pub async fn dispatch(session: Session, task: Task) -> Result<TaskOutcome, CoreError> {
    let name = task.to_string();
    info!(
        task = %name,
        portal = %session.url(),
        user = session.username(),
        "starting task"
    );

    let result = route_task(&session, task).await;

    if let Err(e) = session.logout().await {
        warn!(error = %e, "logout failed");
    }

    match &result {
        Ok(_) => info!(task = %name, "task finished"),
        Err(e) => error!(task = %name, error = %e, "task failed"),
    }
    result
}

async fn route_task(session: &Session, task: Task) -> Result<TaskOutcome, CoreError> {
    match task {
        Task::Status {
            output,
            mode,
            tenants,
        } => status::run(session, output, mode, &tenants)
            .await
            .map(TaskOutcome::Status),

        Task::RunCommand { command, target } => command::run(session, &command, &target)
            .await
            .map(|reports| TaskOutcome::Commands { reports }),

        // ── Single-device actions ────────────────────────────────────
        Task::EnableTelnet { device, code } => {
            let filer = session.resolve_filer(&device).await?;
            session.remote(&filer).enable_telnet(code.as_deref()).await?;
            Ok(applied("enable-telnet", device))
        }

        Task::EnableSsh { device, public_key } => {
            let filer = session.resolve_filer(&device).await?;
            session
                .remote(&filer)
                .start_ssh(public_key.as_deref())
                .await?;
            Ok(applied("enable-ssh", device))
        }

        Task::DisableSsh { device } => {
            let filer = session.resolve_filer(&device).await?;
            session.remote(&filer).stop_ssh().await?;
            Ok(applied("disable-ssh", device))
        }

        Task::SuspendSync { device } => {
            let filer = session.resolve_filer(&device).await?;
            session.remote(&filer).suspend_sync().await?;
            Ok(applied("suspend-sync", device))
        }

        Task::UnsuspendSync { device } => {
            let filer = session.resolve_filer(&device).await?;
            session.remote(&filer).unsuspend_sync().await?;
            Ok(applied("unsuspend-sync", device))
        }

        Task::ResetPassword {
            device,
            username,
            password,
        } => {
            if username.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "username must not be empty".into(),
                });
            }
            let filer = session.resolve_filer(&device).await?;
            session
                .remote(&filer)
                .set_user_password(&username, &password)
                .await?;
            Ok(applied("reset-password", device))
        }
    }
}

fn applied(action: &'static str, device: DeviceRef) -> TaskOutcome {
    info!(action, device = %device, "action applied");
    TaskOutcome::Applied { action, device }
}
