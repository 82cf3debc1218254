//! `ctools run-cmd`: target selection and per-filer results.

use tabled::Tabled;

use ctools_core::{CommandReport, CommandTarget, Task};

use crate::cli::{GlobalOpts, RunCmdArgs};
use crate::error::CliError;
use crate::output::{print_output, render_list};

pub fn build(args: RunCmdArgs) -> Result<Task, CliError> {
    let target =
        CommandTarget::from_flags(args.device, args.all).map_err(|_| CliError::Validation {
            field: "target".into(),
            reason: "pass --device <NAME> for one filer or --all for every filer".into(),
        })?;
    Ok(Task::RunCommand {
        command: args.command,
        target,
    })
}

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Tenant")]
    tenant: String,
    #[tabled(rename = "Filer")]
    filer: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn result_text(report: &CommandReport) -> String {
    match (&report.output, &report.error) {
        (_, Some(error)) => format!("error: {error}"),
        (Some(output), None) => output.trim_end().to_owned(),
        (None, None) => String::new(),
    }
}

pub fn report(reports: &[CommandReport], global: &GlobalOpts) -> Result<(), CliError> {
    let out = render_list(
        &global.output,
        reports,
        |r| CommandRow {
            tenant: r.tenant.clone(),
            filer: r.filer.clone(),
            result: result_text(r),
        },
        |r| format!("{}: {}", r.filer, result_text(r)),
    )?;
    print_output(&out, global.quiet);

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            task: "run-cmd".into(),
            failed,
            total: reports.len(),
        })
    }
}
