//! # Scan Coordinator
//!
//! Fans a target catalog out over a bounded pool of workers and fans the
//! outcomes back in.
//!
//! * Exactly `min(concurrency, targets)` workers exist for the whole scan.
//! * Workers pull the next target from a shared cursor as soon as they are
//!   free, so a slow host only ever occupies one slot.
//! * Every outcome goes through the [`ledger`] in one synchronized update.
//! * [`ScanCoordinator::run`] returns after every worker has joined.
//!
//! Cancellation is cooperative: once the [`CancelSignal`] fires no target is
//! dispatched anymore, probes in flight stop between two attempts, and
//! whatever never started is reported as skipped.
//!
//! Every probe runs on its own task. A probe that panics is recorded as a
//! connection error for its target and the worker moves on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use keyprobe_common::config::Config;
use keyprobe_common::credentials::CredentialMatrix;
use keyprobe_common::network::target::Target;
use keyprobe_common::{error, info, warn};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::clock::{Clock, SystemClock};
use crate::probe::{ProbeOutcome, Prober};

pub mod ledger;

use ledger::{ScanLedger, ScanProgress, ScanStatistics, ValidCredentialRecord};

/// Shared stop flag. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub type ProgressCallback = Arc<dyn Fn(ScanProgress) + Send + Sync>;

/// Everything a finished (or cancelled) scan produced.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub stats: ScanStatistics,
    /// In completion order; the report aggregator sorts them.
    pub records: Vec<ValidCredentialRecord>,
    /// One per probed target, in completion order.
    pub outcomes: Vec<ProbeOutcome>,
    /// Targets never dispatched because the scan was cancelled.
    pub skipped: Vec<Target>,
    pub cancelled: bool,
    /// Credentials in the matrix; zero for a reachability sweep.
    pub trials: usize,
}

pub struct ScanCoordinator {
    concurrency: usize,
    cancel: CancelSignal,
    on_progress: Option<ProgressCallback>,
    clock: Arc<dyn Clock>,
}

impl ScanCoordinator {
    /// A concurrency of zero is treated as one; [`Config::validate`] rejects
    /// it before a coordinator is ever built from user input.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            cancel: CancelSignal::new(),
            on_progress: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.concurrency)
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Called after every ledger update, outside the ledger lock.
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Stamps outcomes the coordinator has to make up for failed probes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[tracing::instrument(name = "scan", skip_all, fields(targets = targets.len()))]
    pub async fn run<P>(&self, targets: Arc<[Target]>, matrix: Arc<CredentialMatrix>, prober: Arc<P>) -> ScanResult
    where
        P: Prober + 'static,
    {
        let total: usize = targets.len();
        let ledger: Arc<ScanLedger> = Arc::new(ScanLedger::new(total));
        let cursor: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
        let workers: usize = self.concurrency.min(total);

        info!(
            "Probing {total} targets with {workers} workers, {} credentials each",
            matrix.len()
        );

        let mut pool: JoinSet<()> = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                targets: Arc::clone(&targets),
                matrix: Arc::clone(&matrix),
                prober: Arc::clone(&prober),
                ledger: Arc::clone(&ledger),
                cursor: Arc::clone(&cursor),
                cancel: self.cancel.clone(),
                on_progress: self.on_progress.clone(),
                clock: Arc::clone(&self.clock),
            };
            pool.spawn(worker.run().instrument(tracing::debug_span!("worker", id)));
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!("Worker stopped unexpectedly: {e}");
            }
        }

        let cancelled: bool = self.cancel.is_cancelled();
        // Workers check the signal before taking an index, so every index
        // below the cursor was probed and recorded.
        let dispatched: usize = cursor.load(Ordering::Relaxed).min(total);
        let (stats, records, outcomes, skipped) = ledger.finish(&targets[dispatched..]);

        if !skipped.is_empty() {
            warn!("{} targets were not probed", skipped.len());
        }

        ScanResult {
            stats,
            records,
            outcomes,
            skipped,
            cancelled,
            trials: matrix.len(),
        }
    }
}

struct Worker<P> {
    targets: Arc<[Target]>,
    matrix: Arc<CredentialMatrix>,
    prober: Arc<P>,
    ledger: Arc<ScanLedger>,
    cursor: Arc<AtomicUsize>,
    cancel: CancelSignal,
    on_progress: Option<ProgressCallback>,
    clock: Arc<dyn Clock>,
}

impl<P: Prober + 'static> Worker<P> {
    async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let idx: usize = self.cursor.fetch_add(1, Ordering::Relaxed);
            let Some(target) = self.targets.get(idx) else {
                break;
            };

            let outcome: ProbeOutcome = self.probe_isolated(target).await;
            let progress: ScanProgress = self.ledger.record(outcome);

            if let Some(on_progress) = &self.on_progress {
                on_progress(progress);
            }
        }
    }

    async fn probe_isolated(&self, target: &Target) -> ProbeOutcome {
        let prober: Arc<P> = Arc::clone(&self.prober);
        let matrix: Arc<CredentialMatrix> = Arc::clone(&self.matrix);
        let cancel: CancelSignal = self.cancel.clone();
        let owned: Target = target.clone();

        let task = tokio::spawn(async move { prober.probe(&owned, &matrix, &cancel).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Probe of {target} failed: {e}");
                ProbeOutcome::aborted(target.clone(), "probe panicked", self.clock.now())
            }
        }
    }
}
