//! Collaborator seams for the probe executor.
//!
//! The engine never speaks a login protocol itself. Reachability goes through
//! a [`Connector`] and every credential attempt through an [`Authenticator`];
//! both are expected to report a definite signal rather than guess from
//! banner text.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use keyprobe_common::credentials::Credential;
use keyprobe_common::network::target::Target;
use thiserror::Error;

pub mod tcp;

/// Answer of the remote service to one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// An attempt that produced no verdict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("timed out")]
    Timeout,
    #[error("connection refused")]
    Refused,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("protocol failure: {0}")]
    Protocol(String),
}

impl AttemptError {
    /// The target is gone, so the remaining credentials are not worth trying.
    pub fn is_target_fatal(&self) -> bool {
        matches!(self, AttemptError::Refused)
    }
}

impl From<io::Error> for AttemptError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => AttemptError::Refused,
            io::ErrorKind::TimedOut => AttemptError::Timeout,
            _ => AttemptError::Transport(err.to_string()),
        }
    }
}

/// Transport-level reachability check.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, target: &Target) -> Result<(), AttemptError>;
}

/// One authentication attempt against one target.
///
/// Implementations open and close whatever session they need per call; the
/// executor bounds every call with its own timeout.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn attempt(&self, target: &Target, credential: &Credential) -> Result<Verdict, AttemptError>;
}

/// Authenticator for runs that never try credentials, such as reachability sweeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthenticator;

#[async_trait]
impl Authenticator for NoAuthenticator {
    async fn attempt(&self, _target: &Target, _credential: &Credential) -> Result<Verdict, AttemptError> {
        Err(AttemptError::Protocol("no authenticator configured".to_string()))
    }
}

#[async_trait]
impl<T: Connector + ?Sized> Connector for Arc<T> {
    async fn connect(&self, target: &Target) -> Result<(), AttemptError> {
        (**self).connect(target).await
    }
}

#[async_trait]
impl<T: Authenticator + ?Sized> Authenticator for Arc<T> {
    async fn attempt(&self, target: &Target, credential: &Credential) -> Result<Verdict, AttemptError> {
        (**self).attempt(target, credential).await
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_attempt_errors() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(AttemptError::from(refused), AttemptError::Refused);

        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert_eq!(AttemptError::from(timed_out), AttemptError::Timeout);

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(AttemptError::from(reset), AttemptError::Transport(_)));
    }

    #[test]
    fn only_refusal_is_target_fatal() {
        assert!(AttemptError::Refused.is_target_fatal());
        assert!(!AttemptError::Timeout.is_target_fatal());
        assert!(!AttemptError::Protocol("bad banner".into()).is_target_fatal());
    }
}
