use std::sync::Arc;

use keyprobe_common::config::Config;
use keyprobe_core::network::NoAuthenticator;
use keyprobe_core::network::tcp::TcpConnector;
use keyprobe_core::plan::AuditPlan;
use keyprobe_core::probe::ProbeExecutor;

use super::inputs::load_catalog;
use super::run::execute;
use super::{OutputArgs, RunArgs, TargetArgs};
use crate::terminal::print;

/// Connects to every target once; no credential is tried.
pub async fn sweep(targets: &TargetArgs, run: &RunArgs, out: &OutputArgs, base: Config) -> anyhow::Result<()> {
    let catalog = load_catalog(targets).await?;
    let plan: AuditPlan = AuditPlan::reachability_only(catalog, run.to_config(base))?;

    print::header("reachability sweep", plan.config().quiet);

    let prober = Arc::new(ProbeExecutor::new(TcpConnector, NoAuthenticator, plan.probe_settings()));
    execute(&plan, prober, out).await?;
    Ok(())
}
