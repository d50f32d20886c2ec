use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use keyprobe_common::credentials::{Credential, CredentialMatrix};
use keyprobe_common::network::host::HostAddr;
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_core::clock::Clock;
use keyprobe_core::network::{AttemptError, Authenticator, Connector, Verdict};
use keyprobe_core::probe::{ProbeExecutor, ProbeOutcome, ProbeSettings, Prober};
use keyprobe_core::scanner::CancelSignal;

pub fn target(host: &str, service: ServiceKind) -> Target {
    Target::with_default_port(host.parse::<HostAddr>().unwrap(), service)
}

pub fn matrix(usernames: &[&str], passwords: &[&str]) -> CredentialMatrix {
    CredentialMatrix::new(
        usernames.iter().map(ToString::to_string).collect(),
        passwords.iter().map(ToString::to_string).collect(),
    )
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Accepts connections only for the configured targets.
#[derive(Default)]
pub struct FakeConnector {
    reachable: HashSet<Target>,
}

impl FakeConnector {
    pub fn reachable(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            reachable: targets.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, target: &Target) -> Result<(), AttemptError> {
        if self.reachable.contains(target) {
            Ok(())
        } else {
            Err(AttemptError::Refused)
        }
    }
}

/// Accepts exactly one credential per configured target and counts attempts.
#[derive(Default)]
pub struct FakeAuthenticator {
    accepted: HashMap<Target, Credential>,
    attempts: AtomicUsize,
    delay: Duration,
}

impl FakeAuthenticator {
    pub fn accepting(mut self, target: Target, credential: Credential) -> Self {
        self.accepted.insert(target, credential);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn attempt(&self, target: &Target, credential: &Credential) -> Result<Verdict, AttemptError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.accepted.get(target) {
            Some(accepted) if accepted == credential => Ok(Verdict::Accepted),
            _ => Ok(Verdict::Rejected),
        }
    }
}

pub type FakeExecutor = ProbeExecutor<FakeConnector, Arc<FakeAuthenticator>>;

pub fn executor(connector: FakeConnector, authenticator: Arc<FakeAuthenticator>) -> FakeExecutor {
    let settings = ProbeSettings {
        timeout: Duration::from_secs(1),
        max_consecutive_errors: 3,
    };
    ProbeExecutor::new(connector, authenticator, settings).with_clock(Arc::new(FixedClock::default()))
}

/// Wraps a prober and records the highest number of probes in flight.
pub struct CountingProber<P> {
    inner: P,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    hold: Duration,
}

impl<P> CountingProber<P> {
    pub fn new(inner: P, hold: Duration) -> Self {
        Self {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
            hold,
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: Prober> Prober for CountingProber<P> {
    async fn probe(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> ProbeOutcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now: usize = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.hold).await;
        let outcome = self.inner.probe(target, matrix, cancel).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Panics instead of probing `target`; delegates everything else.
pub struct PanicOn<P> {
    pub inner: P,
    pub target: Target,
}

#[async_trait]
impl<P: Prober> Prober for PanicOn<P> {
    async fn probe(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> ProbeOutcome {
        if *target == self.target {
            panic!("prober blew up on {target}");
        }
        self.inner.probe(target, matrix, cancel).await
    }
}

/// Fires the scan's cancel signal from inside the first probe.
pub struct CancelFirst<P> {
    pub inner: P,
}

#[async_trait]
impl<P: Prober> Prober for CancelFirst<P> {
    async fn probe(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> ProbeOutcome {
        cancel.cancel();
        self.inner.probe(target, matrix, cancel).await
    }
}
