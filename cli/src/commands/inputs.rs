use std::path::Path;

use anyhow::{Context, bail};
use keyprobe_common::credentials::CredentialMatrix;
use keyprobe_common::network::catalog::TargetCatalog;
use keyprobe_common::network::target::{ServiceKind, Target};
use keyprobe_common::{info, loader, warn};
use keyprobe_core::discovery::{DiscoveryService, ExportedHits, SearchFilters};

use super::{CredentialArgs, SearchArgs, TargetArgs};

/// Builds the deduplicated catalog from the host list and the search export.
pub async fn load_catalog(args: &TargetArgs) -> anyhow::Result<TargetCatalog> {
    if args.targets.is_none() && args.search.hits.is_none() {
        bail!("no target source given, pass --targets and/or --hits");
    }

    let mut catalog: TargetCatalog = TargetCatalog::new();

    if let Some(path) = &args.targets {
        let lines: Vec<String> = loader::read_lines(path)?;
        catalog = TargetCatalog::parse_lines(lines.as_slice(), args.service)
            .with_context(|| format!("parsing target list {}", path.display()))?;
        info!("Loaded {} targets from {}", catalog.len(), path.display());
    }

    if let Some(path) = &args.search.hits {
        let found: Vec<Target> = discover(path, &args.search, args.service).await?;
        let total: usize = found.len();
        let added: usize = catalog.extend(found);
        if added < total {
            warn!("{} search results were already in the catalog", total - added);
        }
    }

    Ok(catalog)
}

async fn discover(path: &Path, args: &SearchArgs, service: ServiceKind) -> anyhow::Result<Vec<Target>> {
    let hits: ExportedHits =
        ExportedHits::load(path).with_context(|| format!("loading search export {}", path.display()))?;
    let filters = SearchFilters {
        country: args.country.clone(),
        port: args.port,
        product: args.product.clone(),
    };

    let discovery = DiscoveryService::new(Box::new(hits));
    Ok(discovery
        .discover_targets(&args.query, &filters, args.limit, service)
        .await?)
}

pub fn load_matrix(args: &CredentialArgs) -> anyhow::Result<CredentialMatrix> {
    let usernames: Vec<String> = loader::read_lines(&args.users)?;
    let passwords: Vec<String> = loader::read_lines(&args.passwords)?;
    info!(
        "Loaded {} usernames and {} passwords",
        usernames.len(),
        passwords.len()
    );
    Ok(CredentialMatrix::new(usernames, passwords))
}
