use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ERROR_BUDGET: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of targets probed at the same time.
    pub concurrency: usize,
    /// Upper bound for the reachability check and for every single
    /// authentication attempt.
    pub timeout: Duration,
    /// Consecutive failed attempts after which a target is abandoned.
    pub max_consecutive_errors: u32,
    pub quiet: u8,
    pub no_banner: bool,
    /// Listens for `q` on the terminal to stop dispatching new targets.
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_consecutive_errors: DEFAULT_ERROR_BUDGET,
            quiet: 0,
            no_banner: false,
            interactive: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_consecutive_errors == 0 {
            return Err(ConfigError::InvalidErrorBudget);
        }
        Ok(())
    }
}

/// Problems that make a whole run impossible. Reported before anything is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no targets available")]
    NoTargets,
    #[error("no credentials supplied")]
    NoCredentials,
    #[error("concurrency must be at least 1 (got {0})")]
    InvalidConcurrency(usize),
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    #[error("consecutive error budget must be at least 1")]
    InvalidErrorBudget,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
