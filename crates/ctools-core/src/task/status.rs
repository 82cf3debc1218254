// Status report pipeline: tenants → connected filers → one row per filer.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use super::{SkippedFiler, StatusSummary, TenantSelector};
use crate::error::CoreError;
use crate::inspector::snapshot;
use crate::model::Tenant;
use crate::report::{OutputMode, ReportWriter};
use crate::session::Session;

pub(super) async fn run(
    session: &Session,
    output: PathBuf,
    mode: OutputMode,
    selector: &TenantSelector,
) -> Result<StatusSummary, CoreError> {
    let started_at = Utc::now();

    let mut report = ReportWriter::prepare_output(&output, mode)?;
    report.write_header()?;

    let tenants: Vec<Tenant> = match selector {
        TenantSelector::All => session.list_tenants().await?,
        TenantSelector::Only(name) => vec![session.tenant(name).await?],
    };

    let mut skipped = Vec::new();
    for tenant in &tenants {
        let scope = session.select_tenant(tenant);
        let filers = scope.connected_filers().await?;
        info!(tenant = %scope.tenant().name, filers = filers.len(), "scanning tenant");

        for filer in &filers {
            match snapshot(session, filer).await {
                Ok(row) => report.append_row(row)?,
                Err(e) if e.is_session_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        tenant = %filer.tenant,
                        filer = %filer.name,
                        error = %e,
                        "skipping filer, status could not be read"
                    );
                    skipped.push(SkippedFiler {
                        tenant: filer.tenant.clone(),
                        filer: filer.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    info!(
        path = %report.path().display(),
        rows = report.rows_written(),
        skipped = skipped.len(),
        "status report written"
    );

    Ok(StatusSummary {
        path: output,
        tenants_scanned: tenants.len(),
        rows_written: report.rows_written(),
        skipped,
        started_at,
        finished_at: Utc::now(),
    })
}
