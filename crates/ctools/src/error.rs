//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into operator-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use ctools_core::{CoreError, ReportError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to portal at {url}")]
    #[diagnostic(
        code(ctools::connection_failed),
        help(
            "Check that the portal is reachable: {reason}\n\
             For a self-signed certificate try --ignore-cert (-i) or --ca-cert."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(ctools::timeout),
        help("Increase the timeout with --timeout or check portal responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for '{username}'")]
    #[diagnostic(
        code(ctools::auth_failed),
        help("Verify the global administrator credentials: {message}")
    )]
    AuthFailed { username: String, message: String },

    #[error("No portal username configured for profile '{profile}'")]
    #[diagnostic(
        code(ctools::no_credentials),
        help("Pass --username, set CTOOLS_USERNAME, or add `username` to the profile.")
    )]
    NoCredentials { profile: String },

    // ── Fleet ────────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(ctools::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    #[error("Permission denied for {path}")]
    #[diagnostic(
        code(ctools::permission_denied),
        help("The portal account needs global administrator rights for this task.")
    )]
    PermissionDenied { path: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Portal error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(ctools::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Task results ─────────────────────────────────────────────────
    #[error("{task}: {failed} of {total} filers failed")]
    #[diagnostic(
        code(ctools::partial_failure),
        help("The per-filer errors are listed above and in the log file.")
    )]
    PartialFailure {
        task: String,
        failed: usize,
        total: usize,
    },

    #[error(transparent)]
    #[diagnostic(
        code(ctools::report),
        help("Use --overwrite to start a new report, or pick another file name.")
    )]
    Report(ReportError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ctools::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(code(ctools::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    #[error("No portal address configured")]
    #[diagnostic(
        code(ctools::no_config),
        help(
            "Pass --address, set CTOOLS_ADDRESS, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ctools::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(ctools::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Io(std::io::Error::other(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl CliError {
    /// Translate a core failure, naming `username` when the portal rejected
    /// the credentials.
    pub fn from_core(err: CoreError, username: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                username: username.to_owned(),
                message,
            },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::TenantNotFound { name } => CliError::NotFound {
                resource_type: "Tenant".into(),
                identifier: name,
                hint: "Tenant names are case-sensitive; check the portal's tenant list.".into(),
            },

            CoreError::DeviceNotFound { name, scope } => CliError::NotFound {
                resource_type: "Device".into(),
                identifier: name,
                hint: format!("Searched {scope}. Check the device name and that it is connected."),
            },

            CoreError::NotFound { path } => CliError::NotFound {
                resource_type: "Resource".into(),
                identifier: path,
                hint: "The portal or filer does not expose this path.".into(),
            },

            CoreError::PermissionDenied { path } => CliError::PermissionDenied { path },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Report(e) => CliError::Report(e),

            CoreError::Config { message } => CliError::Validation {
                field: "address".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
