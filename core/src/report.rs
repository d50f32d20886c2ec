//! # Report Aggregator
//!
//! Pure reduction of a [`ScanResult`] into what the output writers render.
//! Workers finish in any order, so everything here is sorted by target
//! identity (address, service, port) and then by trial index. Two scans that
//! reached the same conclusions produce identical reports.
//!
//! A scan with an empty credential matrix is a reachability sweep: reachable
//! targets get [`TargetVerdict::Reachable`] and the authentication counters
//! stay at zero.

use std::collections::BTreeMap;

use keyprobe_common::network::target::{ServiceKind, Target};
use serde::Serialize;

use crate::probe::{AuthResult, ProbeOutcome};
use crate::scanner::ScanResult;
use crate::scanner::ledger::{ScanStatistics, ValidCredentialRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub reachable: usize,
    pub reachable_by_service: BTreeMap<ServiceKind, usize>,
    pub success: usize,
    pub failed_auth: usize,
    pub connection_errors: usize,
    pub unreachable: usize,
    pub interrupted: usize,
    pub skipped: usize,
    pub attempts: usize,
    pub reachable_pct: f64,
    pub success_pct: f64,
    pub failed_auth_pct: f64,
    pub connection_error_pct: f64,
    pub cancelled: bool,
    pub reachability_only: bool,
}

impl Summary {
    pub fn from_stats(stats: &ScanStatistics, cancelled: bool, reachability_only: bool) -> Self {
        let total: usize = stats.total_targets;
        let reachable: usize = stats.reachable_count();
        let failed_auth: usize = if reachability_only { 0 } else { stats.failed_auth_count };

        Self {
            total,
            reachable,
            reachable_by_service: stats.reachable_by_service.clone(),
            success: stats.success_count,
            failed_auth,
            connection_errors: stats.connection_error_count,
            unreachable: stats.unreachable_count,
            interrupted: stats.interrupted_count,
            skipped: stats.skipped_count,
            attempts: stats.attempts,
            reachable_pct: percentage(reachable, total),
            success_pct: percentage(stats.success_count, total),
            failed_auth_pct: percentage(failed_auth, total),
            connection_error_pct: percentage(stats.connection_error_count, total),
            cancelled,
            reachability_only,
        }
    }
}

/// Final state of one catalog target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetVerdict {
    Unreachable,
    /// Accepted a connection; no credential was tried.
    Reachable,
    Compromised,
    NoMatch,
    ConnectionError,
    Interrupted,
    Skipped,
}

impl From<&AuthResult> for TargetVerdict {
    fn from(auth: &AuthResult) -> Self {
        match auth {
            AuthResult::NotAttempted => TargetVerdict::Unreachable,
            AuthResult::Success { .. } => TargetVerdict::Compromised,
            AuthResult::ExhaustedNoMatch => TargetVerdict::NoMatch,
            AuthResult::ConnectionError { .. } => TargetVerdict::ConnectionError,
            AuthResult::Interrupted { .. } => TargetVerdict::Interrupted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: Target,
    pub verdict: TargetVerdict,
    pub attempts: usize,
}

impl TargetReport {
    fn from_outcome(outcome: &ProbeOutcome, reachability_only: bool) -> Self {
        let verdict: TargetVerdict = match &outcome.auth {
            AuthResult::ExhaustedNoMatch if reachability_only => TargetVerdict::Reachable,
            auth => TargetVerdict::from(auth),
        };
        Self {
            target: outcome.target.clone(),
            verdict,
            attempts: outcome.attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub credentials: Vec<ValidCredentialRecord>,
    pub targets: Vec<TargetReport>,
}

pub fn summarize(result: &ScanResult) -> Report {
    let reachability_only: bool = result.trials == 0;
    let mut targets: Vec<TargetReport> = result
        .outcomes
        .iter()
        .map(|outcome| TargetReport::from_outcome(outcome, reachability_only))
        .chain(result.skipped.iter().map(|target| TargetReport {
            target: target.clone(),
            verdict: TargetVerdict::Skipped,
            attempts: 0,
        }))
        .collect();
    targets.sort_by(|a, b| a.target.cmp(&b.target));

    Report {
        summary: Summary::from_stats(&result.stats, result.cancelled, reachability_only),
        credentials: sorted_records(&result.records),
        targets,
    }
}

pub fn sorted_records(records: &[ValidCredentialRecord]) -> Vec<ValidCredentialRecord> {
    let mut sorted: Vec<ValidCredentialRecord> = records.to_vec();
    sorted.sort_by(|a, b| a.target.cmp(&b.target).then(a.trial.cmp(&b.trial)));
    sorted
}

/// `part / total * 100`, or zero for an empty scan.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use keyprobe_common::credentials::Credential;
    use keyprobe_common::network::host::HostAddr;

    fn target(host: &str) -> Target {
        Target::with_default_port(host.parse::<HostAddr>().unwrap(), ServiceKind::Ssh)
    }

    fn record(host: &str, trial: usize) -> ValidCredentialRecord {
        ValidCredentialRecord {
            target: target(host),
            credential: Credential::new("root", format!("pw{trial}")),
            trial,
            found_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn percentages_guard_empty_scans() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);

        let summary = Summary::from_stats(&ScanStatistics::default(), false, false);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.reachable_pct, 0.0);
        assert_eq!(summary.success_pct, 0.0);
        assert!(!summary.connection_error_pct.is_nan());
    }

    #[test]
    fn records_sort_by_target_then_trial() {
        let records = vec![record("10.0.0.10", 1), record("10.0.0.2", 7), record("10.0.0.2", 3)];
        let sorted = sorted_records(&records);

        let keys: Vec<(String, usize)> = sorted
            .iter()
            .map(|r| (r.target.address().to_string(), r.trial))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("10.0.0.2".to_string(), 3),
                ("10.0.0.2".to_string(), 7),
                ("10.0.0.10".to_string(), 1)
            ]
        );
    }

    #[test]
    fn every_target_gets_one_verdict() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let result = ScanResult {
            stats: ScanStatistics {
                total_targets: 3,
                unreachable_count: 1,
                failed_auth_count: 1,
                skipped_count: 1,
                ..ScanStatistics::default()
            },
            records: Vec::new(),
            outcomes: vec![
                ProbeOutcome {
                    target: target("10.0.0.3"),
                    reachable: true,
                    auth: AuthResult::ExhaustedNoMatch,
                    attempts: 4,
                    attempt_errors: 0,
                    finished_at: at,
                },
                ProbeOutcome::unreachable(target("10.0.0.1"), at),
            ],
            skipped: vec![target("10.0.0.2")],
            cancelled: true,
            trials: 4,
        };

        let report = summarize(&result);
        let verdicts: Vec<TargetVerdict> = report.targets.iter().map(|t| t.verdict).collect();
        assert_eq!(
            verdicts,
            vec![TargetVerdict::Unreachable, TargetVerdict::Skipped, TargetVerdict::NoMatch]
        );
        assert!(report.summary.cancelled);
        assert_eq!(report.summary.skipped, 1);
    }

    #[test]
    fn empty_matrix_reports_reachability() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let up = ProbeOutcome {
            target: target("10.0.0.1"),
            reachable: true,
            auth: AuthResult::ExhaustedNoMatch,
            attempts: 0,
            attempt_errors: 0,
            finished_at: at,
        };
        let mut reachable_by_service = BTreeMap::new();
        reachable_by_service.insert(ServiceKind::Ssh, 1);
        let result = ScanResult {
            stats: ScanStatistics {
                total_targets: 2,
                reachable_by_service,
                failed_auth_count: 1,
                unreachable_count: 1,
                ..ScanStatistics::default()
            },
            records: Vec::new(),
            outcomes: vec![up, ProbeOutcome::unreachable(target("10.0.0.2"), at)],
            skipped: Vec::new(),
            cancelled: false,
            trials: 0,
        };

        let report = summarize(&result);
        let verdicts: Vec<TargetVerdict> = report.targets.iter().map(|t| t.verdict).collect();
        assert_eq!(verdicts, vec![TargetVerdict::Reachable, TargetVerdict::Unreachable]);
        assert!(report.summary.reachability_only);
        assert_eq!(report.summary.reachable, 1);
        assert_eq!(report.summary.failed_auth, 0);
        assert_eq!(report.summary.failed_auth_pct, 0.0);
    }
}
