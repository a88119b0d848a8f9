//! Release resolution and installation against a mock HTTP server

use std::fs;
use std::io::{Cursor, Write};

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zapret_core::{InstallLayout, Ipset, IpsetMode};
use zapret_fetch::{FetchError, InstallEvent, Installer, ReleaseFetcher, ReleaseSource};

/// Answer GET `route` with `response`; unmatched requests get 404
async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn source(server: &MockServer) -> ReleaseSource {
    ReleaseSource {
        repo: "o/r".to_string(),
        api_base: server.uri(),
        web_base: server.uri(),
    }
}

fn fetcher(server: &MockServer) -> ReleaseFetcher {
    ReleaseFetcher::with_source(source(server)).unwrap()
}

fn release_zip() -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in [
        ("r-1.8.5/bin/winws.exe", "MZ"),
        ("r-1.8.5/service.bat", "set \"LOCAL_VERSION=1.8.5\"\r\n"),
        ("r-1.8.5/general.bat", "start \"\" \"%BIN%winws.exe\" --wf-tcp=443\r\n"),
        ("r-1.8.5/lists/list-general.txt", "discord.com\n"),
        ("r-1.8.5/.github/workflow.yml", "x"),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_latest_tag_from_api() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/o/r/releases/latest",
        ResponseTemplate::new(200).set_body_string(r#"{"tag_name":"1.8.5","name":"release"}"#),
    )
    .await;

    assert_eq!(fetcher(&server).latest_tag().await.as_deref(), Some("1.8.5"));
}

#[tokio::test]
async fn test_latest_tag_falls_back_to_web_redirect() {
    let server = MockServer::start().await;
    mount(&server, "/repos/o/r/releases/latest", ResponseTemplate::new(403)).await;
    mount(
        &server,
        "/o/r/releases/latest",
        ResponseTemplate::new(302).insert_header("Location", "/o/r/releases/tag/v2.0"),
    )
    .await;
    mount(
        &server,
        "/o/r/releases/tag/v2.0",
        ResponseTemplate::new(200).set_body_string("<html></html>"),
    )
    .await;

    assert_eq!(fetcher(&server).latest_tag().await.as_deref(), Some("v2.0"));
}

#[tokio::test]
async fn test_check_updates() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/o/r/releases/latest",
        ResponseTemplate::new(200).set_body_string(r#"{"tag_name":"1.9.0"}"#),
    )
    .await;
    let fetcher = fetcher(&server);

    let check = fetcher.check_updates(Some("1.8.5")).await;
    assert!(check.available);
    assert_eq!(check.latest.as_deref(), Some("1.9.0"));

    assert!(!fetcher.check_updates(Some("1.9.0")).await.available);
    assert!(fetcher.check_updates(None).await.available);
}

#[tokio::test]
async fn test_no_release_means_no_update() {
    let server = MockServer::start().await;

    let check = fetcher(&server).check_updates(None).await;
    assert!(!check.available);
    assert_eq!(check.latest, None);
}

#[tokio::test]
async fn test_install_uses_source_archive_fallback() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/o/r/releases/latest",
        ResponseTemplate::new(200).set_body_string(r#"{"tag_name":"1.8.5"}"#),
    )
    .await;
    mount(
        &server,
        "/o/r/archive/refs/tags/1.8.5.zip",
        ResponseTemplate::new(200).set_body_bytes(release_zip()),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let layout = InstallLayout::new(dir.path().join("zapret-gui"));
    let installer = Installer::new(fetcher(&server), layout.clone());

    let mut stages = Vec::new();
    let mut downloaded = 0;
    let installed = installer
        .install(false, &mut |event| match event {
            InstallEvent::Stage { percent, .. } => stages.push(percent),
            InstallEvent::Downloaded { received, .. } => downloaded = received,
        })
        .await
        .unwrap();

    assert_eq!(installed.tag, "1.8.5");
    assert!(installed.url.ends_with("/o/r/archive/refs/tags/1.8.5.zip"));
    assert_eq!(stages, vec![20, 30, 60, 80, 100]);
    assert_eq!(downloaded, release_zip().len() as u64);

    assert!(layout.is_installed());
    assert!(layout.lists_dir().join("list-general.txt").is_file());
    assert!(!layout.zapret_dir().join(".github").exists());
    assert!(!layout.extract_dir().exists());
    assert!(!layout.download_archive().exists());
    assert_eq!(
        zapret_core::version::local_version(&layout).as_deref(),
        Some("1.8.5")
    );
}

#[tokio::test]
async fn test_reset_clears_previous_install() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/o/r/releases/latest",
        ResponseTemplate::new(200).set_body_string(r#"{"tag_name":"1.8.5"}"#),
    )
    .await;
    mount(
        &server,
        "/o/r/releases/download/1.8.5/zapret-discord-youtube-1.8.5.zip",
        ResponseTemplate::new(200).set_body_bytes(release_zip()),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let layout = InstallLayout::new(dir.path());
    fs::create_dir_all(layout.zapret_dir()).unwrap();
    fs::write(layout.zapret_dir().join("stale.bat"), "old").unwrap();

    let installer = Installer::new(fetcher(&server), layout.clone());
    let mut stages = Vec::new();
    installer
        .install(true, &mut |event| {
            if let InstallEvent::Stage { percent, .. } = event {
                stages.push(percent);
            }
        })
        .await
        .unwrap();

    assert_eq!(stages.first(), Some(&10));
    assert!(!layout.zapret_dir().join("stale.bat").exists());
    assert!(layout.zapret_dir().join("general.bat").exists());
}

#[tokio::test]
async fn test_install_fails_when_every_url_fails() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/o/r/releases/latest",
        ResponseTemplate::new(200).set_body_string(r#"{"tag_name":"1.8.5"}"#),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let installer = Installer::new(fetcher(&server), InstallLayout::new(dir.path()));
    let err = installer.install(false, &mut |_| {}).await.unwrap_err();
    assert!(matches!(err, FetchError::DownloadFailed { attempts: 2, .. }));
}

#[tokio::test]
async fn test_fetch_text_feeds_ipset() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/ipset.txt",
        ResponseTemplate::new(200).set_body_string("1.1.1.0/24\n8.8.8.0/24\n"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let ipset = Ipset::new(dir.path());
    let text = fetcher(&server)
        .fetch_text(
            &format!("{}/ipset.txt", server.uri()),
            zapret_fetch::resources::RESOURCE_TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(ipset.store(&text).unwrap(), IpsetMode::Loaded);
}
