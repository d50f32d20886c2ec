use std::sync::Arc;

use keyprobe_common::config::Config;
use keyprobe_common::success;
use keyprobe_core::network::Authenticator;
use keyprobe_core::network::tcp::TcpConnector;
use keyprobe_core::plan::AuditPlan;
use keyprobe_core::probe::ProbeExecutor;

use super::inputs::{load_catalog, load_matrix};
use super::run::execute;
use super::{CredentialArgs, OutputArgs, RunArgs, TargetArgs};
use crate::terminal::print;

/// Full credential audit: reachability, then the credential sweep against
/// every reachable target through `authenticator`.
pub async fn audit<A>(
    targets: &TargetArgs,
    credentials: &CredentialArgs,
    run: &RunArgs,
    out: &OutputArgs,
    base: Config,
    authenticator: A,
) -> anyhow::Result<()>
where
    A: Authenticator + 'static,
{
    let catalog = load_catalog(targets).await?;
    let matrix = load_matrix(credentials)?;
    let plan: AuditPlan = AuditPlan::new(catalog, matrix, run.to_config(base))?;

    print::header("credential audit", plan.config().quiet);

    let prober = Arc::new(ProbeExecutor::new(TcpConnector, authenticator, plan.probe_settings()));
    let report = execute(&plan, prober, out).await?;

    if report.summary.success > 0 {
        success!("{} valid credentials found", report.credentials.len());
    }
    Ok(())
}
