//! Validated inputs of one run.
//!
//! Building an [`AuditPlan`] is the single place where a run can fail as a
//! whole; once it exists, every per-target problem is data, not an error.

use std::sync::Arc;

use keyprobe_common::config::{Config, ConfigError};
use keyprobe_common::credentials::CredentialMatrix;
use keyprobe_common::network::catalog::TargetCatalog;
use keyprobe_common::network::target::Target;

use crate::probe::ProbeSettings;
use crate::scanner::ScanCoordinator;

#[derive(Debug, Clone)]
pub struct AuditPlan {
    targets: Arc<[Target]>,
    matrix: Arc<CredentialMatrix>,
    config: Config,
}

impl AuditPlan {
    /// A full credential audit. Both the catalog and the matrix must be non-empty.
    pub fn new(catalog: TargetCatalog, matrix: CredentialMatrix, config: Config) -> Result<Self, ConfigError> {
        if matrix.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        Self::build(catalog, matrix, config)
    }

    /// A reachability sweep: every target is connected to, no credential is tried.
    pub fn reachability_only(catalog: TargetCatalog, config: Config) -> Result<Self, ConfigError> {
        Self::build(catalog, CredentialMatrix::default(), config)
    }

    fn build(catalog: TargetCatalog, matrix: CredentialMatrix, config: Config) -> Result<Self, ConfigError> {
        if catalog.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        config.validate()?;

        Ok(Self {
            targets: catalog.into_shared(),
            matrix: Arc::new(matrix),
            config,
        })
    }

    pub fn targets(&self) -> Arc<[Target]> {
        Arc::clone(&self.targets)
    }

    pub fn matrix(&self) -> Arc<CredentialMatrix> {
        Arc::clone(&self.matrix)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings::from(&self.config)
    }

    pub fn coordinator(&self) -> ScanCoordinator {
        ScanCoordinator::from_config(&self.config)
    }

    /// Upper bound on credential attempts for the whole run.
    pub fn max_attempts(&self) -> usize {
        self.targets.len().saturating_mul(self.matrix.len())
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
