//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `ctools_core::SessionConfig`.
//!
//! Core never sees these types -- it receives a pre-built `SessionConfig`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use ctools_core::{SessionConfig, TlsVerification, portal_url};

use crate::cli::GlobalOpts;
use crate::commands::util::prompt_password;
use crate::error::CliError;

/// Password value that asks for an interactive prompt instead.
pub const PROMPT_SENTINEL: &str = "?";

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when --profile is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named portal profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub ignore_cert: bool,

    /// Where rotating log files go when --log-dir is not given.
    pub log_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            ignore_cert: false,
            log_dir: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// One portal.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Portal IP, hostname, FQDN or URL.
    pub address: String,

    pub username: Option<String>,

    /// Plaintext password. "?" (or leaving it out) prompts at run time.
    pub password: Option<String>,

    pub ignore_cert: Option<bool>,

    pub ca_cert: Option<PathBuf>,

    pub timeout: Option<u64>,
}

// ── Paths ────────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ctera", "ctools")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default directory for rotating log files.
pub fn default_log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

fn home_fallback() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    home.join(".config").join("ctools")
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load the config from defaults, the TOML file and `CTOOLS_` variables.
///
/// Nested keys use a double underscore: `CTOOLS_DEFAULTS__TIMEOUT=60`.
/// A missing file is not an error.
pub fn load_config() -> Result<Config, CliError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("CTOOLS_").split("__"))
        .extract()?;
    Ok(config)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Session resolution ───────────────────────────────────────────────

/// Build the `SessionConfig` for this run.
///
/// Each setting comes from the first of: command-line flag or `CTOOLS_*`
/// variable, the active profile, the `[defaults]` table. A missing or "?"
/// password is read from the terminal.
pub fn resolve_session(global: &GlobalOpts, config: &Config) -> Result<SessionConfig, CliError> {
    resolve_session_with(global, config, || prompt_password("Portal password: "))
}

fn resolve_session_with(
    global: &GlobalOpts,
    config: &Config,
    prompt: impl FnOnce() -> Result<SecretString, CliError>,
) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profiles.get(&profile_name);

    // An explicitly requested profile must exist.
    if profile.is_none() && global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(config),
        });
    }

    let address = global
        .address
        .as_deref()
        .or(profile.map(|p| p.address.as_str()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let url = portal_url(address).map_err(|e| CliError::Validation {
        field: "address".into(),
        reason: e.to_string(),
    })?;

    let username = global
        .username
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;

    let password = match global
        .password
        .as_deref()
        .or(profile.and_then(|p| p.password.as_deref()))
    {
        Some(value) if value != PROMPT_SENTINEL => SecretString::from(value.to_owned()),
        _ => prompt()?,
    };

    let ignore_cert = global.ignore_cert
        || profile
            .and_then(|p| p.ignore_cert)
            .unwrap_or(config.defaults.ignore_cert);
    let ca_cert = global
        .ca_cert
        .clone()
        .or_else(|| profile.and_then(|p| p.ca_cert.clone()));
    let tls = match (ignore_cert, ca_cert) {
        (true, _) => TlsVerification::DangerAcceptInvalid,
        (false, Some(path)) => TlsVerification::CustomCa(path),
        (false, None) => TlsVerification::SystemDefaults,
    };

    let timeout = global
        .timeout
        .or(profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);

    Ok(SessionConfig {
        url,
        username,
        password,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
