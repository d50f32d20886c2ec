use colored::*;
use keyprobe_common::config::Config;
use keyprobe_common::credentials::Credential;
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_common::success;
use keyprobe_core::plan::AuditPlan;

use super::inputs::{load_catalog, load_matrix};
use super::{CredentialArgs, TargetArgs};
use crate::kprint;
use crate::terminal::{colors, print};

pub async fn plan(targets: &TargetArgs, credentials: &CredentialArgs, preview: usize, cfg: Config) -> anyhow::Result<()> {
    let catalog = load_catalog(targets).await?;
    let matrix = load_matrix(credentials)?;
    let plan: AuditPlan = AuditPlan::new(catalog, matrix, cfg)?;

    print::header("audit plan", plan.config().quiet);
    print_sizes(&plan);
    kprint!();
    print_trials(&plan, preview);

    success!("Inputs are valid, {} attempts at most", plan.max_attempts());
    Ok(())
}

fn print_sizes(plan: &AuditPlan) {
    let targets = plan.targets();
    let matrix = plan.matrix();
    let per_service = |service: ServiceKind| targets.iter().filter(|t: &&Target| t.service() == service).count();

    print::set_key_width(["Targets", "Usernames", "Passwords", "Trials", "Max attempts"]);
    print::aligned_line("Targets", targets.len().to_string());
    print::aligned_line("  ssh", per_service(ServiceKind::Ssh).to_string());
    print::aligned_line("  telnet", per_service(ServiceKind::Telnet).to_string());
    print::aligned_line("Usernames", matrix.usernames().len().to_string());
    print::aligned_line("Passwords", matrix.passwords().len().to_string());
    print::aligned_line("Trials", matrix.len().to_string());
    print::aligned_line("Max attempts", plan.max_attempts().to_string().bold());
}

fn print_trials(plan: &AuditPlan, preview: usize) {
    let matrix = plan.matrix();
    let shown: Vec<(usize, Credential)> = matrix.trials().take(preview).collect();

    for (trial, credential) in &shown {
        print::tree_head(*trial, &credential.username);
        print::as_tree_one_level(&[("password".into(), credential.password.color(colors::ACCENT))]);
    }

    let rest: usize = matrix.len().saturating_sub(shown.len());
    if rest > 0 {
        print::print_status(format!("... {rest} more trials"));
    }
}
