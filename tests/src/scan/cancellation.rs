#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_core::report::{TargetVerdict, summarize};
use keyprobe_core::scanner::{CancelSignal, ScanCoordinator};

use crate::fakes::{FakeAuthenticator, FakeConnector, executor, matrix, target};

#[tokio::test]
async fn cancelled_before_start_skips_everything() {
    let targets: Vec<Target> = (1..=3)
        .map(|i| target(&format!("10.1.0.{i}"), ServiceKind::Ssh))
        .collect();
    let authenticator = Arc::new(FakeAuthenticator::default());
    let prober = Arc::new(executor(FakeConnector::reachable(targets.clone()), Arc::clone(&authenticator)));

    let cancel = CancelSignal::new();
    cancel.cancel();

    let result = ScanCoordinator::new(2)
        .with_cancel(cancel)
        .run(targets.into(), Arc::new(matrix(&["root"], &["root"])), prober)
        .await;

    assert!(result.cancelled);
    assert!(result.outcomes.is_empty());
    assert_eq!(result.skipped.len(), 3);
    assert_eq!(result.stats.skipped_count, 3);
    assert_eq!(authenticator.attempts(), 0);
}

#[tokio::test]
async fn every_target_keeps_exactly_one_verdict_after_cancel() {
    let targets: Vec<Target> = (1..=12)
        .map(|i| target(&format!("10.1.1.{i}"), ServiceKind::Ssh))
        .collect();
    let authenticator = Arc::new(FakeAuthenticator::default().with_delay(Duration::from_millis(5)));
    let prober = Arc::new(executor(FakeConnector::reachable(targets.clone()), authenticator));

    let coordinator = ScanCoordinator::new(2);
    let cancel = coordinator.cancel_signal();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
    });

    let credentials = Arc::new(matrix(&["root", "admin", "user"], &["a", "b", "c", "d"]));
    let result = coordinator.run(targets.clone().into(), credentials, prober).await;
    let report = summarize(&result);

    assert!(result.cancelled);
    assert_eq!(report.targets.len(), targets.len());
    assert_eq!(result.outcomes.len() + result.skipped.len(), targets.len());
    assert_eq!(result.stats.completed() + result.stats.skipped_count, targets.len());
    assert!(report.targets.iter().any(|t| t.verdict == TargetVerdict::Skipped));

    let mut seen: Vec<&Target> = report.targets.iter().map(|t| &t.target).collect();
    seen.dedup();
    assert_eq!(seen.len(), targets.len());
}
