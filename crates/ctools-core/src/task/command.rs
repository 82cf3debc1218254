// Remote command pipeline: one debug-CLI call per target filer.

use tracing::{info, warn};

use super::{CommandReport, CommandTarget};
use crate::error::CoreError;
use crate::session::Session;

pub(super) async fn run(
    session: &Session,
    command: &str,
    target: &CommandTarget,
) -> Result<Vec<CommandReport>, CoreError> {
    if command.trim().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "command must not be empty".into(),
        });
    }

    let filers = match target {
        CommandTarget::Device(name) => vec![session.find_connected_filer(name).await?],
        CommandTarget::AllFilers => session.all_connected_filers().await?,
    };
    info!(command, filers = filers.len(), "running remote command");

    let mut reports = Vec::with_capacity(filers.len());
    for filer in &filers {
        match session.remote(filer).run_cli_command(command).await {
            Ok(output) => {
                info!(tenant = %filer.tenant, filer = %filer.name, "command completed");
                reports.push(CommandReport::success(filer, output));
            }
            Err(e) => {
                let e = CoreError::from(e);
                if e.is_session_fatal() {
                    return Err(e);
                }
                warn!(tenant = %filer.tenant, filer = %filer.name, error = %e, "command failed");
                reports.push(CommandReport::failure(filer, &e));
            }
        }
    }
    Ok(reports)
}
