//! # Target Discovery
//!
//! Grows a target catalog from an external search index.
//!
//! The engine only knows the [`SearchIndex`] trait. Paging, quotas and
//! backoff against a live index are the implementation's business.
//! [`ExportedHits`] is the bundled implementation: it answers queries from a
//! JSON-lines export of earlier index results.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use keyprobe_common::network::host::HostAddr;
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_common::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub country: Option<String>,
    pub port: Option<u16>,
    pub product: Option<String>,
}

/// One host reported by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub address: HostAddr,
    pub port: u16,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    /// Remaining index fields (banner, org, ...), kept for query matching.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl SearchHit {
    fn matches(&self, query: &str, filters: &SearchFilters) -> bool {
        if let Some(port) = filters.port
            && self.port != port
        {
            return false;
        }
        if let Some(country) = &filters.country
            && !self
                .country
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(country))
        {
            return false;
        }
        if let Some(product) = &filters.product
            && !contains_ignore_case(self.product.as_deref(), product)
        {
            return false;
        }

        let query = query.trim();
        query.is_empty() || self.mentions(query)
    }

    fn mentions(&self, needle: &str) -> bool {
        contains_ignore_case(self.product.as_deref(), needle)
            || self
                .metadata
                .values()
                .any(|v| contains_ignore_case(v.as_str(), needle))
    }

    /// Service named by the product or banner, else the one conventionally
    /// on the port the index saw open.
    pub fn service(&self) -> Option<ServiceKind> {
        if self.mentions("telnet") {
            Some(ServiceKind::Telnet)
        } else if self.mentions("ssh") {
            Some(ServiceKind::Ssh)
        } else {
            ServiceKind::from_port(self.port)
        }
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("reading search export: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line} of search export: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, query: &str, filters: &SearchFilters, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Search results exported from an index, one JSON object per line.
#[derive(Debug, Clone, Default)]
pub struct ExportedHits {
    hits: Vec<SearchHit>,
}

impl ExportedHits {
    pub fn from_json_lines(content: &str) -> Result<Self, SearchError> {
        let mut hits: Vec<SearchHit> = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let hit: SearchHit =
                serde_json::from_str(line).map_err(|source| SearchError::Decode { line: idx + 1, source })?;
            hits.push(hit);
        }
        Ok(Self { hits })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let content: String = std::fs::read_to_string(path)?;
        Self::from_json_lines(&content)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[async_trait]
impl SearchIndex for ExportedHits {
    async fn search(&self, query: &str, filters: &SearchFilters, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self
            .hits
            .iter()
            .filter(|hit| hit.matches(query, filters))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Turns index results into audit targets.
pub struct DiscoveryService {
    index: Box<dyn SearchIndex>,
}

impl DiscoveryService {
    pub fn new(index: Box<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// Every hit becomes one target on the port the index saw open. The
    /// service is inferred from the hit; `default_service` applies only when
    /// the hit does not say.
    pub async fn discover_targets(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
        default_service: ServiceKind,
    ) -> Result<Vec<Target>, SearchError> {
        let hits: Vec<SearchHit> = self.index.search(query, filters, limit).await?;
        info!("Search index returned {} hosts", hits.len());

        Ok(hits
            .into_iter()
            .map(|hit| {
                let service: ServiceKind = hit.service().unwrap_or(default_service);
                Target::new(hit.address, service, hit.port)
            })
            .collect())
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
