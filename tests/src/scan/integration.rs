#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use keyprobe_common::credentials::{Credential, CredentialMatrix};
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_core::probe::AuthResult;
use keyprobe_core::report::{TargetVerdict, summarize};
use keyprobe_core::scanner::{ScanCoordinator, ScanResult};

use crate::fakes::{CancelFirst, CountingProber, FakeAuthenticator, FakeConnector, PanicOn, executor, matrix, target};

fn default_matrix() -> CredentialMatrix {
    matrix(&["root", "admin"], &["root", "toor", "admin"])
}

/// One reachable SSH host accepting admin/admin, one unreachable telnet host.
#[tokio::test]
async fn finds_admin_admin_and_skips_the_dead_host() {
    let ssh: Target = target("10.0.0.1", ServiceKind::Ssh);
    let telnet: Target = target("10.0.0.2", ServiceKind::Telnet);

    let authenticator = Arc::new(FakeAuthenticator::default().accepting(ssh.clone(), Credential::new("admin", "admin")));
    let prober = Arc::new(executor(FakeConnector::reachable([ssh.clone()]), Arc::clone(&authenticator)));
    let targets: Arc<[Target]> = vec![ssh.clone(), telnet.clone()].into();

    let result: ScanResult = ScanCoordinator::new(2)
        .run(targets, Arc::new(default_matrix()), prober)
        .await;

    assert_eq!(result.stats.total_targets, 2);
    assert_eq!(result.stats.reachable_count(), 1);
    assert_eq!(result.stats.success_count, 1);
    assert_eq!(result.stats.unreachable_count, 1);
    assert_eq!(result.records.len(), 1);

    let record = &result.records[0];
    assert_eq!(record.target, ssh);
    assert_eq!(record.target.port(), 22);
    assert_eq!(record.credential, Credential::new("admin", "admin"));
    assert_eq!(record.trial, 5);
    assert_eq!(authenticator.attempts(), 6);

    let report = summarize(&result);
    assert_eq!(report.targets[0].verdict, TargetVerdict::Compromised);
    assert_eq!(report.targets[1].target, telnet);
    assert_eq!(report.targets[1].verdict, TargetVerdict::Unreachable);
    assert_eq!(report.targets[1].attempts, 0);
}

#[tokio::test]
async fn never_exceeds_the_worker_bound() {
    let targets: Vec<Target> = (1..=20)
        .map(|i| target(&format!("10.0.1.{i}"), ServiceKind::Ssh))
        .collect();
    let inner = executor(
        FakeConnector::reachable(targets.clone()),
        Arc::new(FakeAuthenticator::default()),
    );
    let prober = Arc::new(CountingProber::new(inner, Duration::from_millis(10)));

    let result = ScanCoordinator::new(4)
        .run(targets.into(), Arc::new(default_matrix()), Arc::clone(&prober))
        .await;

    assert!(prober.peak() <= 4, "peak in flight was {}", prober.peak());
    assert!(prober.peak() >= 2);
    assert_eq!(prober.started(), 20);
    assert_eq!(result.stats.total_targets, 20);
    assert_eq!(result.stats.failed_auth_count, 20);
    assert_eq!(result.stats.attempts, 20 * 6);
}

#[tokio::test]
async fn more_workers_than_targets_is_fine() {
    let targets: Vec<Target> = vec![target("10.0.2.1", ServiceKind::Ssh)];
    let prober = Arc::new(CountingProber::new(
        executor(FakeConnector::default(), Arc::new(FakeAuthenticator::default())),
        Duration::ZERO,
    ));

    let result = ScanCoordinator::new(64)
        .run(targets.into(), Arc::new(default_matrix()), Arc::clone(&prober))
        .await;

    assert_eq!(prober.peak(), 1);
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.stats.unreachable_count, 1);
}

#[tokio::test]
async fn empty_matrix_exhausts_immediately() {
    let host: Target = target("10.0.3.1", ServiceKind::Ssh);
    let authenticator = Arc::new(FakeAuthenticator::default());
    let prober = Arc::new(executor(FakeConnector::reachable([host.clone()]), Arc::clone(&authenticator)));

    let result = ScanCoordinator::new(1)
        .run(vec![host].into(), Arc::new(CredentialMatrix::default()), prober)
        .await;

    assert_eq!(result.outcomes[0].auth, AuthResult::ExhaustedNoMatch);
    assert_eq!(result.outcomes[0].attempts, 0);
    assert_eq!(authenticator.attempts(), 0);
    assert_eq!(result.stats.reachable_count(), 1);
    assert_eq!(result.stats.failed_auth_count, 1);
}

#[tokio::test]
async fn unreachable_targets_cost_no_attempts() {
    let targets: Vec<Target> = (1..=5)
        .map(|i| target(&format!("10.0.4.{i}"), ServiceKind::Telnet))
        .collect();
    let authenticator = Arc::new(FakeAuthenticator::default());
    let prober = Arc::new(executor(FakeConnector::default(), Arc::clone(&authenticator)));

    let result = ScanCoordinator::new(3)
        .run(targets.into(), Arc::new(default_matrix()), prober)
        .await;

    assert_eq!(authenticator.attempts(), 0);
    assert_eq!(result.stats.unreachable_count, 5);
    assert_eq!(result.stats.attempts, 0);
    assert!(result.outcomes.iter().all(|o| !o.reachable));
}

#[tokio::test]
async fn a_panicking_probe_costs_only_its_own_target() {
    let targets: Vec<Target> = (1..=4)
        .map(|i| target(&format!("10.0.5.{i}"), ServiceKind::Ssh))
        .collect();
    let prober = Arc::new(PanicOn {
        inner: executor(
            FakeConnector::reachable(targets.clone()),
            Arc::new(FakeAuthenticator::default()),
        ),
        target: targets[0].clone(),
    });

    let result = ScanCoordinator::new(1)
        .run(targets.clone().into(), Arc::new(default_matrix()), prober)
        .await;

    assert!(!result.cancelled);
    assert!(result.skipped.is_empty());
    assert_eq!(result.outcomes.len(), 4);
    assert_eq!(result.stats.failed_auth_count, 3);
    assert_eq!(result.stats.connection_error_count, 1);

    let broken = result
        .outcomes
        .iter()
        .find(|o| o.target == targets[0])
        .unwrap();
    assert_eq!(
        broken.auth,
        AuthResult::ConnectionError {
            reason: "probe panicked".into(),
            after_attempts: 0
        }
    );
}

#[tokio::test]
async fn duplicate_entries_are_each_accounted_for() {
    let a: Target = target("10.0.6.1", ServiceKind::Ssh);
    let b: Target = target("10.0.6.2", ServiceKind::Ssh);
    let prober = Arc::new(CancelFirst {
        inner: executor(
            FakeConnector::reachable([a.clone(), b.clone()]),
            Arc::new(FakeAuthenticator::default()),
        ),
    });

    let result = ScanCoordinator::new(1)
        .run(vec![a.clone(), b.clone(), a.clone()].into(), Arc::new(default_matrix()), prober)
        .await;

    assert!(result.cancelled);
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.skipped, vec![b, a]);
    assert_eq!(result.stats.completed() + result.stats.skipped_count, result.stats.total_targets);
}
