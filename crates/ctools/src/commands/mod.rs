//! Command handlers: CLI args -> core `Task` before login, `TaskOutcome`
//! -> formatted output after the session is closed.

pub mod device;
pub mod run_cmd;
pub mod status;
pub mod util;

use ctools_core::{Task, TaskOutcome};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Turn a parsed subcommand into a core task.
///
/// Runs before login, so invalid input and interactive prompts never hold
/// a portal session open.
pub fn build_task(cmd: Command, global: &GlobalOpts) -> Result<Task, CliError> {
    match cmd {
        Command::Status(args) => status::build(args, global),
        Command::RunCmd(args) => run_cmd::build(args),
        Command::EnableTelnet(args) => Ok(device::enable_telnet(args)),
        Command::EnableSsh(args) => Ok(device::enable_ssh(args)),
        Command::DisableSsh(args) => Ok(Task::DisableSsh {
            device: device::device_ref(args),
        }),
        Command::SuspendSync(args) => Ok(Task::SuspendSync {
            device: device::device_ref(args),
        }),
        Command::UnsuspendSync(args) => Ok(Task::UnsuspendSync {
            device: device::device_ref(args),
        }),
        Command::ResetPassword(args) => device::reset_password(args),
        // Handled in main before any portal work.
        Command::Completions(_) => Err(CliError::Internal(
            "completions do not run against a portal".into(),
        )),
    }
}

/// Print a task outcome. Tasks that ran but failed on some filers end in
/// [`CliError::PartialFailure`].
pub fn report(outcome: &TaskOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    match outcome {
        TaskOutcome::Status(summary) => status::report(summary, global),
        TaskOutcome::Commands { reports } => run_cmd::report(reports, global),
        TaskOutcome::Applied { action, device } => device::report(action, device, global),
    }
}
