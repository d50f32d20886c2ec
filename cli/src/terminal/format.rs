use colored::*;
use keyprobe_common::network::target::ServiceKind;
use keyprobe_core::report::{Summary, TargetReport, TargetVerdict};

use crate::terminal::colors;

pub fn verdict(verdict: TargetVerdict) -> ColoredString {
    match verdict {
        TargetVerdict::Compromised => "compromised".color(colors::COMPROMISED).bold(),
        TargetVerdict::NoMatch => "no match".color(colors::NO_MATCH),
        TargetVerdict::ConnectionError => "connection error".color(colors::FAILURE),
        TargetVerdict::Interrupted => "interrupted".color(colors::FAILURE),
        TargetVerdict::Reachable => "reachable".color(colors::NO_MATCH),
        TargetVerdict::Unreachable => "unreachable".color(colors::MUTED),
        TargetVerdict::Skipped => "skipped".color(colors::MUTED),
    }
}

pub fn target_line(report: &TargetReport) -> String {
    format!(
        "{} {} {}",
        report.target.to_string().color(colors::ACCENT),
        verdict(report.verdict),
        format!("({} attempts)", report.attempts).color(colors::SEPARATOR)
    )
}

pub fn count_with_pct(count: usize, pct: f64) -> String {
    format!("{count} ({pct:.1}%)")
}

/// Key/value rows of the end-of-scan summary.
pub fn summary_rows(summary: &Summary) -> Vec<(String, ColoredString)> {
    let mut rows: Vec<(String, ColoredString)> = vec![
        ("Targets".into(), summary.total.to_string().bold()),
        (
            "Reachable".into(),
            count_with_pct(summary.reachable, summary.reachable_pct).green(),
        ),
    ];

    for service in [ServiceKind::Ssh, ServiceKind::Telnet] {
        let count: usize = summary.reachable_by_service.get(&service).copied().unwrap_or(0);
        rows.push((format!("  {service}"), count.to_string().normal()));
    }

    if !summary.reachability_only {
        rows.extend(auth_rows(summary));
    }
    rows.push((
        String::from("Conn. errors"),
        count_with_pct(summary.connection_errors, summary.connection_error_pct).color(colors::FAILURE),
    ));
    rows.push((String::from("Unreachable"), summary.unreachable.to_string().color(colors::MUTED)));

    if summary.interrupted > 0 || summary.skipped > 0 {
        rows.push((String::from("Interrupted"), summary.interrupted.to_string().color(colors::FAILURE)));
        rows.push((String::from("Skipped"), summary.skipped.to_string().color(colors::MUTED)));
    }
    rows
}

fn auth_rows(summary: &Summary) -> [(String, ColoredString); 3] {
    [
        (
            String::from("Compromised"),
            count_with_pct(summary.success, summary.success_pct).color(colors::COMPROMISED).bold(),
        ),
        (
            String::from("No match"),
            count_with_pct(summary.failed_auth, summary.failed_auth_pct).normal(),
        ),
        (String::from("Attempts"), summary.attempts.to_string().normal()),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
