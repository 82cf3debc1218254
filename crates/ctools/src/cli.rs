//! Clap derive structures for the `ctools` CLI.
//!
//! Only clap types live here: `build.rs` includes this file to render man
//! pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ctools -- check and maintain CTERA Edge Filers through the portal
#[derive(Debug, Parser)]
#[command(
    name = "ctools",
    version,
    about = "Check and maintain CTERA Edge Filers through the portal",
    long_about = "A toolbox of maintenance tasks for CTERA Edge Filers.\n\n\
        Every task logs in to the portal as a global administrator, runs once,\n\
        and logs out again. Filers are reached through the portal's remote\n\
        device API; no direct connection to a filer is made.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Portal IP, hostname, FQDN or URL (overrides profile)
    #[arg(long, env = "CTOOLS_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Portal global administrator
    #[arg(long, env = "CTOOLS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Administrator password; "?" prompts without echo
    #[arg(long, env = "CTOOLS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Accept invalid or self-signed TLS certificates
    #[arg(long, short = 'i', env = "CTOOLS_IGNORE_CERT", global = true)]
    pub ignore_cert: bool,

    /// PEM file with the CA that signed the portal certificate
    #[arg(long, env = "CTOOLS_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Portal profile from the config file
    #[arg(long, env = "CTOOLS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CTOOLS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Output format for task results
    #[arg(
        long,
        short = 'o',
        env = "CTOOLS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Directory for the rotating log files
    #[arg(long, env = "CTOOLS_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record the current status of connected filers in a CSV file
    #[command(alias = "get_status", alias = "get-status")]
    Status(StatusArgs),

    /// Run a command on one or more connected filers
    #[command(alias = "run_cmd")]
    RunCmd(RunCmdArgs),

    /// Enable telnet on a filer
    #[command(alias = "enable_telnet")]
    EnableTelnet(EnableTelnetArgs),

    /// Enable SSH on a filer
    #[command(alias = "enable_ssh")]
    EnableSsh(EnableSshArgs),

    /// Disable SSH on a filer
    #[command(alias = "disable_ssh")]
    DisableSsh(DeviceArgs),

    /// Suspend cloud sync on a filer
    #[command(alias = "suspend_sync")]
    SuspendSync(DeviceArgs),

    /// Resume cloud sync on a filer
    #[command(alias = "unsuspend_sync")]
    UnsuspendSync(DeviceArgs),

    /// Reset a local user's password on a filer
    #[command(alias = "reset_password")]
    ResetPassword(ResetPasswordArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Output CSV file
    pub filename: PathBuf,

    /// All filers of all tenants (the default without --tenant)
    #[arg(long, short = 'a', conflicts_with = "tenant")]
    pub all: bool,

    /// Only report filers of this tenant
    #[arg(long, short = 't')]
    pub tenant: Option<String>,

    /// Replace an existing report without asking
    #[arg(long, conflicts_with = "append")]
    pub overwrite: bool,

    /// Add rows to an existing report without asking
    #[arg(long)]
    pub append: bool,
}

#[derive(Debug, Args)]
pub struct RunCmdArgs {
    /// Command to run through the filer's debug CLI
    pub command: String,

    /// Run on every connected filer of every tenant
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Run on this filer only. Overrides --all
    #[arg(long, short = 'd')]
    pub device: Option<String>,
}

/// A filer addressed by name within its tenant.
#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device name
    pub device: String,

    /// Tenant name
    pub tenant: String,
}

#[derive(Debug, Args)]
pub struct EnableTelnetArgs {
    #[command(flatten)]
    pub target: DeviceArgs,

    /// Unlock code required by the filer
    #[arg(long, short = 'c')]
    pub code: Option<String>,
}

#[derive(Debug, Args)]
pub struct EnableSshArgs {
    #[command(flatten)]
    pub target: DeviceArgs,

    /// SSH public key to install
    #[arg(long, short = 'p')]
    pub pubkey: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    #[command(flatten)]
    pub target: DeviceArgs,

    /// Local user on the filer
    pub user: String,

    /// New password; "?" prompts without echo
    pub new_password: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
