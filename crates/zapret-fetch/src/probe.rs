//! Connectivity test for a single domain

use std::fmt;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::debug;

/// Timeout for each probe step
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent for the HTTPS probe, some sites reject unknown agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Outcome of one probe step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    /// Step succeeded with a value after `elapsed`
    Ok {
        /// What the step produced
        value: T,
        /// Time taken
        elapsed: Duration,
    },
    /// Step failed
    Failed(String),
}

/// DNS and HTTPS results for a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Domain that was probed
    pub domain: String,
    /// First resolved address
    pub dns: ProbeOutcome<IpAddr>,
    /// HTTPS status code
    pub https: ProbeOutcome<u16>,
}

impl ProbeReport {
    /// Whether both steps succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self.dns, ProbeOutcome::Ok { .. }) && matches!(self.https, ProbeOutcome::Ok { .. })
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dns {
            ProbeOutcome::Ok { value, elapsed } => {
                writeln!(f, "✓ DNS: {} ({}ms)", value, elapsed.as_millis())?
            }
            ProbeOutcome::Failed(e) => writeln!(f, "✗ DNS: {e}")?,
        }
        match &self.https {
            ProbeOutcome::Ok { value, elapsed } => {
                write!(f, "✓ HTTPS: {} ({}ms)", value, elapsed.as_millis())
            }
            ProbeOutcome::Failed(e) => write!(f, "✗ HTTPS: {e}"),
        }
    }
}

/// Reduce user input to a bare host name: scheme and path are dropped
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Resolve `domain` and fetch `https://<domain>`
pub async fn probe(client: &Client, domain: &str) -> ProbeReport {
    let domain = normalize_domain(domain);
    let dns = resolve(&domain).await;
    let https = fetch(client, &domain).await;
    debug!("Probe of {}: {:?} / {:?}", domain, dns, https);
    ProbeReport { domain, dns, https }
}

async fn resolve(domain: &str) -> ProbeOutcome<IpAddr> {
    let start = Instant::now();
    match timeout(PROBE_TIMEOUT, lookup_host((domain, 443))).await {
        Ok(Ok(mut addrs)) => match addrs.next() {
            Some(addr) => ProbeOutcome::Ok {
                value: addr.ip(),
                elapsed: start.elapsed(),
            },
            None => ProbeOutcome::Failed("no addresses".to_string()),
        },
        Ok(Err(e)) => ProbeOutcome::Failed(e.to_string()),
        Err(_) => ProbeOutcome::Failed("timed out".to_string()),
    }
}

async fn fetch(client: &Client, domain: &str) -> ProbeOutcome<u16> {
    let start = Instant::now();
    let result = client
        .get(format!("https://{domain}"))
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await;
    match result {
        Ok(response) => ProbeOutcome::Ok {
            value: response.status().as_u16(),
            elapsed: start.elapsed(),
        },
        Err(e) => ProbeOutcome::Failed(e.to_string()),
    }
}
