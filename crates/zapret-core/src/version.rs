//! Release version detection and comparison

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

use crate::layout::InstallLayout;

static LOCAL_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"set\s+"LOCAL_VERSION=([^"]+)""#).expect("valid regex")
});

static README_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tag: v?(\d+\.\d+(\.\d+)?)").expect("valid regex"));

static README_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"zapret-discord-youtube v?(\d+\.\d+)").expect("valid regex"));

/// Version declared by `service.bat` via `set "LOCAL_VERSION=..."`
pub fn parse_local_version(service_bat: &str) -> Option<String> {
    LOCAL_VERSION_RE
        .captures(service_bat)
        .map(|c| c[1].to_string())
}

/// Version mentioned in the release README
pub fn parse_readme_version(readme: &str) -> Option<String> {
    README_TAG_RE
        .captures(readme)
        .or_else(|| README_TITLE_RE.captures(readme))
        .map(|c| c[1].to_string())
}

fn read_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Installed version from `service.bat`
pub fn local_version(layout: &InstallLayout) -> Option<String> {
    read_lossy(&layout.service_bat()).and_then(|s| parse_local_version(&s))
}

/// Installed version from `README.md`
pub fn readme_version(layout: &InstallLayout) -> Option<String> {
    read_lossy(&layout.readme()).and_then(|s| parse_readme_version(&s))
}

/// Lenient semver parse: strips a leading `v` and pads `X.Y` to `X.Y.0`
pub fn parse_version(tag: &str) -> Option<Version> {
    let trimmed = tag.trim().trim_start_matches(['v', 'V']);
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }
    let parts = trimmed.split('.').count();
    let padded = match parts {
        1 => format!("{trimmed}.0.0"),
        2 => format!("{trimmed}.0"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// Whether `latest` is newer than `local`.
///
/// No local version, or either side failing to parse, counts as newer.
pub fn is_newer(latest: &str, local: Option<&str>) -> bool {
    let Some(local) = local else {
        return true;
    };
    match (parse_version(latest), parse_version(local)) {
        (Some(latest), Some(local)) => latest.cmp(&local) == Ordering::Greater,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_version() {
        let bat = "@echo off\nset \"LOCAL_VERSION=1.8.5\"\nset \"X=1\"\n";
        assert_eq!(parse_local_version(bat).as_deref(), Some("1.8.5"));
        assert_eq!(parse_local_version("@echo off"), None);
    }

    #[test]
    fn test_parse_readme_version() {
        assert_eq!(
            parse_readme_version("badge tag: v1.9.2 here").as_deref(),
            Some("1.9.2")
        );
        assert_eq!(
            parse_readme_version("# zapret-discord-youtube v1.7").as_deref(),
            Some("1.7")
        );
        assert_eq!(parse_readme_version("nothing"), None);
    }

    #[test]
    fn test_parse_version_lenient() {
        assert_eq!(parse_version("v1.9.2"), Some(Version::new(1, 9, 2)));
        assert_eq!(parse_version("1.7"), Some(Version::new(1, 7, 0)));
        assert_eq!(parse_version("2"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_version("1.8.5b"), None);
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("1.9.0", Some("1.8.5")));
        assert!(!is_newer("v1.8.5", Some("1.8.5")));
        assert!(!is_newer("1.8.4", Some("1.8.5")));
        assert!(is_newer("1.9.0", None));
        assert!(is_newer("weird", Some("1.8.5")));
    }
}
