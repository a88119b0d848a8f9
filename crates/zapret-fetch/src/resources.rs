//! Auxiliary resources published in the release repository

use std::path::Path;
use std::time::Duration;

use tracing::info;
use zapret_core::{hosts, Ipset, IpsetMode};

use crate::error::Result;
use crate::release::ReleaseFetcher;

/// Raw file root of the repository's main branch
pub const RAW_BASE: &str =
    "https://raw.githubusercontent.com/Flowseal/zapret-discord-youtube/refs/heads/main";

/// Timeout for resource downloads
pub const RESOURCE_TIMEOUT: Duration = Duration::from_secs(15);

/// Maintained ipset list
pub fn ipset_url() -> String {
    format!("{RAW_BASE}/.service/ipset-service.txt")
}

/// Discord voice server hosts entries
pub fn discord_hosts_url() -> String {
    format!("{RAW_BASE}/.service/discord-hosts.txt")
}

/// Replace the ipset list with the maintained one
pub async fn update_ipset(fetcher: &ReleaseFetcher, ipset: &Ipset) -> Result<IpsetMode> {
    let content = fetcher.fetch_text(&ipset_url(), RESOURCE_TIMEOUT).await?;
    let mode = ipset.store(&content)?;
    info!("ipset list updated ({} bytes)", content.len());
    Ok(mode)
}

/// Merge the Discord voice entries into `hosts_path`.
///
/// Returns `false` when the entries were already present.
pub async fn update_hosts(fetcher: &ReleaseFetcher, hosts_path: &Path) -> Result<bool> {
    let entries = fetcher
        .fetch_text(&discord_hosts_url(), RESOURCE_TIMEOUT)
        .await?;
    Ok(hosts::merge_into(hosts_path, &entries)?)
}
