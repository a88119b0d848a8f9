//! GitHub release resolution and download

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use zapret_core::version;

use crate::error::{FetchError, Result};

/// Repository publishing the zapret releases
pub const GITHUB_REPO: &str = "Flowseal/zapret-discord-youtube";

/// User agent sent with every request; GitHub rejects requests without one
pub const USER_AGENT: &str = concat!("zapret-gui/", env!("CARGO_PKG_VERSION"));

/// Timeout for the releases API
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the release web page fallback
pub const WEB_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for downloading a release archive
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Where releases are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    /// `owner/name` of the repository
    pub repo: String,
    /// REST API root, e.g. `https://api.github.com`
    pub api_base: String,
    /// Web root, e.g. `https://github.com`
    pub web_base: String,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            repo: GITHUB_REPO.to_string(),
            api_base: "https://api.github.com".to_string(),
            web_base: "https://github.com".to_string(),
        }
    }
}

impl ReleaseSource {
    /// Latest release API endpoint
    pub fn api_latest_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repo)
    }

    /// Latest release web page, redirects to `/releases/tag/<tag>`
    pub fn web_latest_url(&self) -> String {
        format!("{}/{}/releases/latest", self.web_base, self.repo)
    }

    /// Archive URLs for `tag` in order of preference: the release asset,
    /// then the source archive
    pub fn candidate_urls(&self, tag: &str) -> Vec<String> {
        vec![
            format!(
                "{}/{}/releases/download/{tag}/zapret-discord-youtube-{tag}.zip",
                self.web_base, self.repo
            ),
            format!("{}/{}/archive/refs/tags/{tag}.zip", self.web_base, self.repo),
        ]
    }
}

/// Tag named by a `/releases/tag/<tag>` URL
pub fn tag_from_release_url(url: &str) -> Option<String> {
    if !url.contains("/releases/tag/") {
        return None;
    }
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Outcome of an update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    /// Whether the latest release is newer than the installed one
    pub available: bool,
    /// Latest release tag, if it could be determined
    pub latest: Option<String>,
}

/// Resolves and downloads releases
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    client: Client,
    source: ReleaseSource,
}

impl ReleaseFetcher {
    /// Fetcher for the default repository
    pub fn new() -> Result<Self> {
        Self::with_source(ReleaseSource::default())
    }

    /// Fetcher for a custom source
    pub fn with_source(source: ReleaseSource) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, source })
    }

    /// Release source in use
    pub fn source(&self) -> &ReleaseSource {
        &self.source
    }

    /// Shared HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Latest release tag.
    ///
    /// Tries the API first and falls back to the redirect of the web
    /// release page. Failures of either are logged; `None` means neither
    /// produced a tag.
    pub async fn latest_tag(&self) -> Option<String> {
        match self.latest_tag_from_api().await {
            Ok(tag) => {
                debug!("API found tag: {}", tag);
                return Some(tag);
            }
            Err(e) => warn!("Release API check failed: {}", e),
        }

        match self.latest_tag_from_web().await {
            Ok(Some(tag)) => {
                debug!("Web page found tag: {}", tag);
                Some(tag)
            }
            Ok(None) => {
                warn!("Release page did not redirect to a tag");
                None
            }
            Err(e) => {
                warn!("Release page check failed: {}", e);
                None
            }
        }
    }

    async fn latest_tag_from_api(&self) -> Result<String> {
        let url = self.source.api_latest_url();
        let response = self.client.get(&url).timeout(API_TIMEOUT).send().await?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        let release: LatestRelease = response.json().await?;
        Ok(release.tag_name)
    }

    async fn latest_tag_from_web(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.source.web_latest_url())
            .timeout(WEB_TIMEOUT)
            .send()
            .await?;
        Ok(tag_from_release_url(response.url().as_str()))
    }

    /// Compare the latest release with the installed `local` version
    pub async fn check_updates(&self, local: Option<&str>) -> UpdateCheck {
        match self.latest_tag().await {
            Some(latest) => UpdateCheck {
                available: version::is_newer(&latest, local),
                latest: Some(latest),
            },
            None => UpdateCheck {
                available: false,
                latest: None,
            },
        }
    }

    /// Download `url` to `dest`, reporting `(received, total)` bytes.
    ///
    /// Anything but HTTP 200 is an error and leaves `dest` untouched.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_progress: &mut (dyn FnMut(u64, Option<u64>) + Send),
    ) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let total = response.content_length();
        let mut file = File::create(dest).await?;
        let mut received = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            on_progress(received, total);
        }
        file.flush().await?;

        info!("Downloaded {} bytes from {}", received, url);
        Ok(received)
    }

    /// Download the archive for `tag`, trying each candidate URL in turn
    pub async fn download_release(
        &self,
        tag: &str,
        dest: &Path,
        on_progress: &mut (dyn FnMut(u64, Option<u64>) + Send),
    ) -> Result<String> {
        let urls = self.source.candidate_urls(tag);
        for url in &urls {
            debug!("Trying {}", url);
            match self.download(url, dest, on_progress).await {
                Ok(_) => return Ok(url.clone()),
                Err(e) => warn!("Download from {} failed: {}", url, e),
            }
        }
        Err(FetchError::DownloadFailed {
            tag: tag.to_string(),
            attempts: urls.len(),
        })
    }

    /// GET `url` and return the body as text
    pub async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
