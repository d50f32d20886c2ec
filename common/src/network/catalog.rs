//! # Target Catalog
//!
//! The flat, deduplicated list of endpoints a scan runs over. Duplicates
//! (same address, service and port) collapse silently; the first occurrence
//! keeps its position so the catalog order follows the input order.

use std::collections::HashSet;
use std::sync::Arc;

use crate::network::target::{self, ServiceKind, Target, TargetParseError};

#[derive(Debug, Clone, Default)]
pub struct TargetCatalog {
    targets: Vec<Target>,
    seen: HashSet<Target>,
}

impl TargetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from raw host-list lines.
    ///
    /// Line numbers in errors are one-based and count only the lines passed in.
    pub fn parse_lines<S: AsRef<str>>(
        lines: &[S],
        default_service: ServiceKind,
    ) -> Result<Self, TargetParseError> {
        let mut catalog = Self::new();
        for (idx, line) in lines.iter().enumerate() {
            let targets = target::expand_line(line.as_ref(), default_service).map_err(|e| {
                TargetParseError::AtLine {
                    line: idx + 1,
                    source: Box::new(e),
                }
            })?;
            catalog.extend(targets);
        }
        Ok(catalog)
    }

    /// Adds `target` unless an identical one is already present.
    pub fn insert(&mut self, target: Target) -> bool {
        if self.seen.insert(target.clone()) {
            self.targets.push(target);
            true
        } else {
            false
        }
    }

    /// Returns how many of the given targets were new.
    pub fn extend<I: IntoIterator<Item = Target>>(&mut self, targets: I) -> usize {
        let mut added: usize = 0;
        for target in targets {
            if self.insert(target) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Freezes the catalog into a cheaply cloneable, read-only slice.
    pub fn into_shared(self) -> Arc<[Target]> {
        Arc::from(self.targets)
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
