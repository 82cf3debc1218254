//! `ctools status`: report file handling and the scan summary.

use std::path::Path;

use tabled::Tabled;
use tracing::info;

use ctools_core::{OutputMode, StatusSummary, Task, TenantSelector};

use super::util;
use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output::{print_output, render_single, render_table};

pub fn build(args: StatusArgs, global: &GlobalOpts) -> Result<Task, CliError> {
    let mode = output_mode(&args.filename, args.overwrite, args.append, global.yes)?;
    let tenants = match args.tenant {
        Some(name) if !args.all => TenantSelector::Only(name),
        _ => TenantSelector::All,
    };
    Ok(Task::Status {
        output: args.filename,
        mode,
        tenants,
    })
}

/// Decide between replacing and appending to an existing report.
///
/// Explicit flags win. Otherwise the operator is asked; without a terminal
/// (and without --yes) existing rows are kept.
fn output_mode(path: &Path, overwrite: bool, append: bool, yes: bool) -> Result<OutputMode, CliError> {
    if overwrite {
        return Ok(OutputMode::Replace);
    }
    if append {
        return Ok(OutputMode::Append);
    }
    if !path.exists() {
        info!(path = %path.display(), "creating new report");
        return Ok(OutputMode::Replace);
    }
    if !yes && !util::is_interactive() {
        info!(path = %path.display(), "report exists, appending");
        return Ok(OutputMode::Append);
    }

    let replace = util::confirm(
        &format!(
            "{} exists. Delete it and start a new report? (no appends to it)",
            path.display()
        ),
        yes,
    )?;
    Ok(if replace {
        OutputMode::Replace
    } else {
        OutputMode::Append
    })
}

#[derive(Tabled)]
struct SkippedRow {
    #[tabled(rename = "Tenant")]
    tenant: String,
    #[tabled(rename = "Filer")]
    filer: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn report(summary: &StatusSummary, global: &GlobalOpts) -> Result<(), CliError> {
    let out = render_single(&global.output, summary, detail, |s| {
        s.path.display().to_string()
    })?;
    print_output(&out, global.quiet);

    if summary.skipped.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            task: "status".into(),
            failed: summary.skipped.len(),
            total: summary.rows_written + summary.skipped.len(),
        })
    }
}

fn detail(summary: &StatusSummary) -> String {
    let elapsed = summary.finished_at - summary.started_at;
    let mut out = format!(
        "Report:          {}\n\
         Tenants scanned: {}\n\
         Rows written:    {}\n\
         Elapsed:         {} ms",
        summary.path.display(),
        summary.tenants_scanned,
        summary.rows_written,
        elapsed.num_milliseconds(),
    );

    if !summary.skipped.is_empty() {
        let rows: Vec<SkippedRow> = summary
            .skipped
            .iter()
            .map(|s| SkippedRow {
                tenant: s.tenant.clone(),
                filer: s.filer.clone(),
                reason: s.reason.clone(),
            })
            .collect();
        out.push_str("\n\nSkipped filers:\n");
        out.push_str(&render_table(&rows));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_decide_without_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.csv");
        std::fs::write(&path, "Gateway\r\n").unwrap();

        assert_eq!(
            output_mode(&path, true, false, false).unwrap(),
            OutputMode::Replace
        );
        assert_eq!(
            output_mode(&path, false, true, false).unwrap(),
            OutputMode::Append
        );
    }

    #[test]
    fn new_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.csv");

        assert_eq!(
            output_mode(&path, false, false, false).unwrap(),
            OutputMode::Replace
        );
    }

    #[test]
    fn yes_approves_replacing_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.csv");
        std::fs::write(&path, "Gateway\r\n").unwrap();

        assert_eq!(
            output_mode(&path, false, false, true).unwrap(),
            OutputMode::Replace
        );
    }
}
