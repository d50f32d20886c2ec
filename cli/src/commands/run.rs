use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use keyprobe_common::config::Config;
use keyprobe_common::{info, success, warn};
use keyprobe_core::plan::AuditPlan;
use keyprobe_core::probe::Prober;
use keyprobe_core::report::{Report, TargetVerdict, summarize};
use keyprobe_core::scanner::ledger::ScanProgress;
use keyprobe_core::scanner::{CancelSignal, ScanResult};

use super::OutputArgs;
use crate::kprint;
use crate::output;
use crate::terminal::input::KeyListener;
use crate::terminal::{colors, format, print, progress};

/// Runs `plan` through its coordinator with progress, cancellation and the
/// end-of-scan output shared by every scanning command.
pub async fn execute<P>(plan: &AuditPlan, prober: Arc<P>, out: &OutputArgs) -> anyhow::Result<Report>
where
    P: Prober + 'static,
{
    let cfg: &Config = plan.config();
    let cancel: CancelSignal = CancelSignal::new();
    let bar = progress::start(plan.targets().len(), cfg.interactive, cfg.quiet);
    let coordinator = plan
        .coordinator()
        .with_cancel(cancel.clone())
        .with_progress(Arc::new(move |p: ScanProgress| bar.update(p)));

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, waiting for running probes to finish");
                cancel.cancel();
            }
        })
    };
    let listener: Option<KeyListener> = cfg.interactive.then(|| KeyListener::start(cancel.clone()));

    let start_time: Instant = Instant::now();
    let result: ScanResult = coordinator.run(plan.targets(), plan.matrix(), prober).await;
    let elapsed: Duration = start_time.elapsed();

    drop(listener);
    ctrl_c.abort();
    bar.finish_and_clear();

    let report: Report = summarize(&result);
    print_targets(&report, cfg);
    print_summary(&report, elapsed, cfg);

    if let Some(dir) = &out.out_dir {
        write_files(dir, &report)?;
    }
    Ok(report)
}

fn print_targets(report: &Report, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    for target in &report.targets {
        if cfg.quiet > 0 && target.verdict == TargetVerdict::Unreachable {
            continue;
        }
        print::print_status(format::target_line(target));
    }
}

fn print_summary(report: &Report, elapsed: Duration, cfg: &Config) {
    let summary = &report.summary;
    let total_time: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();

    if summary.cancelled {
        warn!("Scan was cancelled, {} targets were skipped", summary.skipped);
    }

    if cfg.quiet > 0 {
        if summary.reachability_only {
            success!("{} of {} targets reachable in {total_time}", summary.reachable, summary.total);
        } else {
            success!("{} of {} targets compromised in {total_time}", summary.success, summary.total);
        }
        return;
    }

    kprint!();
    print::header("summary", cfg.quiet);
    print::as_tree_one_level(&format::summary_rows(summary));
    print::fat_separator();
    print::centerln(&format!(
        "{}",
        format!("Scan finished in {total_time}").color(colors::TEXT_DEFAULT)
    ));
}

fn write_files(dir: &Path, report: &Report) -> anyhow::Result<()> {
    for path in output::write_report(dir, report)? {
        info!("Wrote {}", path.display());
    }
    Ok(())
}
