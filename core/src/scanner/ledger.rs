//! The only shared mutable state of a scan.
//!
//! Workers hand every finished [`ProbeOutcome`] to [`ScanLedger::record`],
//! which applies all counter updates and the credential append under one
//! lock acquisition. The lock is never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use keyprobe_common::credentials::Credential;
use keyprobe_common::network::target::{ServiceKind, Target};
use serde::Serialize;

use crate::probe::{AuthResult, ProbeOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    pub total_targets: usize,
    pub reachable_by_service: BTreeMap<ServiceKind, usize>,
    pub success_count: usize,
    pub failed_auth_count: usize,
    pub connection_error_count: usize,
    pub unreachable_count: usize,
    pub interrupted_count: usize,
    pub skipped_count: usize,
    /// Credential attempts started across all targets.
    pub attempts: usize,
    /// Attempts that ended without a verdict, across all targets.
    pub attempt_errors: usize,
}

impl ScanStatistics {
    pub fn reachable_count(&self) -> usize {
        self.reachable_by_service.values().sum()
    }

    /// Targets with a recorded outcome.
    pub fn completed(&self) -> usize {
        self.unreachable_count
            + self.success_count
            + self.failed_auth_count
            + self.connection_error_count
            + self.interrupted_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidCredentialRecord {
    pub target: Target,
    pub credential: Credential,
    /// Position of the credential in trial order.
    pub trial: usize,
    pub found_at: DateTime<Utc>,
}

/// Counters as seen right after one ledger update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
    pub successes: usize,
}

pub(crate) type LedgerParts = (
    ScanStatistics,
    Vec<ValidCredentialRecord>,
    Vec<ProbeOutcome>,
    Vec<Target>,
);

#[derive(Debug, Default)]
struct LedgerState {
    stats: ScanStatistics,
    records: Vec<ValidCredentialRecord>,
    outcomes: Vec<ProbeOutcome>,
}

#[derive(Debug)]
pub(crate) struct ScanLedger {
    state: Mutex<LedgerState>,
}

impl ScanLedger {
    pub(crate) fn new(total_targets: usize) -> Self {
        let stats = ScanStatistics {
            total_targets,
            ..ScanStatistics::default()
        };
        Self {
            state: Mutex::new(LedgerState {
                stats,
                ..LedgerState::default()
            }),
        }
    }

    // A poisoned lock only means another worker panicked mid-update of an
    // unrelated target; the counters themselves stay consistent.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accounts for one finished probe.
    pub(crate) fn record(&self, outcome: ProbeOutcome) -> ScanProgress {
        let mut state = self.lock();
        let LedgerState {
            stats,
            records,
            outcomes,
        } = &mut *state;

        stats.attempts += outcome.attempts;
        stats.attempt_errors += outcome.attempt_errors;

        if outcome.reachable {
            *stats
                .reachable_by_service
                .entry(outcome.target.service())
                .or_default() += 1;
        }

        match &outcome.auth {
            AuthResult::NotAttempted => stats.unreachable_count += 1,
            AuthResult::Success { credential, trial } => {
                stats.success_count += 1;
                records.push(ValidCredentialRecord {
                    target: outcome.target.clone(),
                    credential: credential.clone(),
                    trial: *trial,
                    found_at: outcome.finished_at,
                });
            }
            AuthResult::ExhaustedNoMatch => stats.failed_auth_count += 1,
            AuthResult::ConnectionError { .. } => stats.connection_error_count += 1,
            AuthResult::Interrupted { .. } => stats.interrupted_count += 1,
        }

        outcomes.push(outcome);

        ScanProgress {
            completed: outcomes.len(),
            total: stats.total_targets,
            successes: stats.success_count,
        }
    }

    /// Takes the final state out of the ledger once every worker has joined.
    ///
    /// `undispatched` is the tail of the catalog no worker ever took.
    pub(crate) fn finish(&self, undispatched: &[Target]) -> LedgerParts {
        let mut state = self.lock();
        let LedgerState {
            mut stats,
            records,
            outcomes,
        } = std::mem::take(&mut *state);

        let skipped: Vec<Target> = undispatched.to_vec();
        stats.skipped_count = skipped.len();

        (stats, records, outcomes, skipped)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
