#![cfg(test)]
//! Host list text in, serialized report out.

use std::sync::Arc;

use keyprobe_common::config::Config;
use keyprobe_common::credentials::Credential;
use keyprobe_common::loader;
use keyprobe_common::network::catalog::TargetCatalog;
use keyprobe_common::network::host::HostAddr;
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_core::plan::AuditPlan;
use keyprobe_core::network::NoAuthenticator;
use keyprobe_core::network::tcp::TcpConnector;
use keyprobe_core::probe::ProbeExecutor;
use keyprobe_core::report::{Report, TargetVerdict, summarize};
use keyprobe_core::scanner::ScanCoordinator;

use crate::fakes::{FakeAuthenticator, FakeConnector, executor, matrix, target};

const HOSTS: &str = "
10.0.0.1
telnet://10.0.0.2

10.0.0.8/30
10.0.0.1:22
ssh://10.0.0.20:2222
";

fn catalog() -> TargetCatalog {
    TargetCatalog::parse_lines(&loader::parse_lines(HOSTS), ServiceKind::Ssh).unwrap()
}

async fn audit(concurrency: usize) -> Report {
    let cfg = Config {
        concurrency,
        ..Config::default()
    };
    let plan = AuditPlan::new(catalog(), matrix(&["root", "admin"], &["root", "toor", "admin"]), cfg).unwrap();

    let alt_port = Target::new("10.0.0.20".parse::<HostAddr>().unwrap(), ServiceKind::Ssh, 2222);
    let reachable: Vec<Target> = plan
        .targets()
        .iter()
        .filter(|t| t.service() == ServiceKind::Ssh)
        .cloned()
        .collect();
    let authenticator = FakeAuthenticator::default()
        .accepting(target("10.0.0.9", ServiceKind::Ssh), Credential::new("root", "toor"))
        .accepting(alt_port, Credential::new("admin", "admin"));
    let prober = Arc::new(executor(FakeConnector::reachable(reachable), Arc::new(authenticator)));

    let coordinator: ScanCoordinator = plan.coordinator();
    let result = coordinator.run(plan.targets(), plan.matrix(), prober).await;
    summarize(&result)
}

#[tokio::test]
async fn catalog_expands_and_deduplicates() {
    let catalog = catalog();
    let rendered: Vec<String> = catalog.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "ssh://10.0.0.1:22",
            "telnet://10.0.0.2:23",
            "ssh://10.0.0.8:22",
            "ssh://10.0.0.9:22",
            "ssh://10.0.0.10:22",
            "ssh://10.0.0.11:22",
            "ssh://10.0.0.20:2222",
        ]
    );
}

#[tokio::test]
async fn report_lists_sorted_findings() {
    let report = audit(3).await;

    assert_eq!(report.summary.total, 7);
    assert_eq!(report.summary.reachable, 6);
    assert_eq!(report.summary.success, 2);
    assert_eq!(report.summary.failed_auth, 4);
    assert_eq!(report.summary.unreachable, 1);

    let found: Vec<(String, usize)> = report
        .credentials
        .iter()
        .map(|r| (r.target.to_string(), r.trial))
        .collect();
    assert_eq!(
        found,
        vec![("ssh://10.0.0.9:22".to_string(), 1), ("ssh://10.0.0.20:2222".to_string(), 5)]
    );
}

#[tokio::test]
async fn identical_runs_serialize_identically() {
    let first = serde_json::to_vec(&audit(4).await).unwrap();
    let second = serde_json::to_vec(&audit(4).await).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrency_does_not_change_the_report() {
    let sequential = audit(1).await;
    let parallel = audit(7).await;
    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn reachability_sweep_reports_reachable_not_no_match() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();

    let mut catalog = TargetCatalog::new();
    catalog.insert(Target::new("127.0.0.1".parse::<HostAddr>().unwrap(), ServiceKind::Ssh, port));
    let plan = AuditPlan::reachability_only(catalog, Config::default()).unwrap();

    let prober = Arc::new(ProbeExecutor::new(TcpConnector, NoAuthenticator, plan.probe_settings()));
    let result = plan.coordinator().run(plan.targets(), plan.matrix(), prober).await;
    let report = summarize(&result);

    assert_eq!(report.targets[0].verdict, TargetVerdict::Reachable);
    assert_eq!(report.targets[0].attempts, 0);
    assert!(report.summary.reachability_only);
    assert_eq!(report.summary.reachable, 1);
    assert_eq!(report.summary.failed_auth, 0);
    assert_eq!(report.summary.failed_auth_pct, 0.0);
}
