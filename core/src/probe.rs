//! # Probe Executor
//!
//! Audits exactly one target:
//! 1. **Reachability**: one connect through the [`Connector`], bounded by the timeout.
//! 2. **Sweep**: credentials in trial order, one attempt at a time, each
//!    bounded by the timeout. The first accepted credential ends the sweep.
//!
//! The executor owns no shared state. Everything it learns is returned in a
//! [`ProbeOutcome`] and accounted for by the coordinator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keyprobe_common::config::Config;
use keyprobe_common::credentials::{Credential, CredentialMatrix};
use keyprobe_common::debug;
use keyprobe_common::network::target::Target;
use serde::Serialize;
use tracing::Instrument;

use crate::clock::{Clock, SystemClock};
use crate::network::{AttemptError, Authenticator, Connector, Verdict};
use crate::scanner::CancelSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub max_consecutive_errors: u32,
}

impl From<&Config> for ProbeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            timeout: cfg.timeout,
            max_consecutive_errors: cfg.max_consecutive_errors,
        }
    }
}

/// How the credential sweep against one target ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthResult {
    /// The target was unreachable, so no credential was tried.
    NotAttempted,
    /// `credential` was accepted at zero-based position `trial`.
    Success { credential: Credential, trial: usize },
    /// Every credential was tried and rejected (or failed without aborting).
    ExhaustedNoMatch,
    /// The sweep was abandoned: the target refused connections or the
    /// consecutive-error budget ran out.
    ConnectionError { reason: String, after_attempts: usize },
    /// The scan was cancelled between two attempts.
    Interrupted { after_attempts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub target: Target,
    pub reachable: bool,
    pub auth: AuthResult,
    /// Credential attempts actually started.
    pub attempts: usize,
    /// Attempts that ended without a verdict.
    pub attempt_errors: usize,
    pub finished_at: DateTime<Utc>,
}

impl ProbeOutcome {
    pub fn unreachable(target: Target, finished_at: DateTime<Utc>) -> Self {
        Self {
            target,
            reachable: false,
            auth: AuthResult::NotAttempted,
            attempts: 0,
            attempt_errors: 0,
            finished_at,
        }
    }

    /// A target whose probe ended without producing an outcome of its own.
    pub fn aborted(target: Target, reason: impl Into<String>, finished_at: DateTime<Utc>) -> Self {
        Self {
            target,
            reachable: false,
            auth: AuthResult::ConnectionError {
                reason: reason.into(),
                after_attempts: 0,
            },
            attempts: 0,
            attempt_errors: 0,
            finished_at,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.auth, AuthResult::Success { .. })
    }
}

/// Anything that can turn one target into one outcome.
///
/// The coordinator only depends on this trait, which keeps it testable with
/// instrumented fakes.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> ProbeOutcome;
}

pub struct ProbeExecutor<C, A> {
    connector: C,
    authenticator: A,
    settings: ProbeSettings,
    clock: Arc<dyn Clock>,
}

struct Sweep {
    auth: AuthResult,
    attempts: usize,
    errors: usize,
}

impl<C: Connector, A: Authenticator> ProbeExecutor<C, A> {
    pub fn new(connector: C, authenticator: A, settings: ProbeSettings) -> Self {
        Self {
            connector,
            authenticator,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, AttemptError>
    where
        F: Future<Output = Result<T, AttemptError>>,
    {
        match tokio::time::timeout(self.settings.timeout, fut).await {
            Ok(result) => result,
            Err(_elapsed) => Err(AttemptError::Timeout),
        }
    }

    async fn sweep(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> Sweep {
        let mut auth = AuthResult::ExhaustedNoMatch;
        let mut attempts: usize = 0;
        let mut errors: usize = 0;
        let mut consecutive_errors: u32 = 0;

        for (trial, credential) in matrix.trials() {
            if cancel.is_cancelled() {
                auth = AuthResult::Interrupted { after_attempts: attempts };
                break;
            }

            attempts += 1;
            let result = self
                .bounded(self.authenticator.attempt(target, &credential))
                .await;

            match result {
                Ok(Verdict::Accepted) => {
                    debug!("{target}: trial {trial} accepted for user '{}'", credential.username);
                    auth = AuthResult::Success { credential, trial };
                    break;
                }
                Ok(Verdict::Rejected) => {
                    consecutive_errors = 0;
                }
                Err(err) => {
                    errors += 1;
                    consecutive_errors += 1;
                    debug!("{target}: trial {trial} failed: {err}");

                    if err.is_target_fatal() || consecutive_errors >= self.settings.max_consecutive_errors {
                        auth = AuthResult::ConnectionError {
                            reason: err.to_string(),
                            after_attempts: attempts,
                        };
                        break;
                    }
                }
            }
        }

        Sweep {
            auth,
            attempts,
            errors,
        }
    }
}

#[async_trait]
impl<C: Connector, A: Authenticator> Prober for ProbeExecutor<C, A> {
    async fn probe(&self, target: &Target, matrix: &CredentialMatrix, cancel: &CancelSignal) -> ProbeOutcome {
        let span = tracing::debug_span!("probe", %target);

        async move {
            if let Err(err) = self.bounded(self.connector.connect(target)).await {
                debug!("{target} unreachable: {err}");
                return ProbeOutcome::unreachable(target.clone(), self.clock.now());
            }

            let sweep: Sweep = self.sweep(target, matrix, cancel).await;

            ProbeOutcome {
                target: target.clone(),
                reachable: true,
                auth: sweep.auth,
                attempts: sweep.attempts,
                attempt_errors: sweep.errors,
                finished_at: self.clock.now(),
            }
        }
        .instrument(span)
        .await
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
