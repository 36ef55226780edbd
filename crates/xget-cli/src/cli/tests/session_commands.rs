//! Command handlers run against a session over a temporary storage file.

use crate::cli::commands::{run_download, run_settings, run_transform};
use crate::cli::session::Session;
use crate::cli::{SettingsAction, Switch};
use xget_core::background::DownloadOutcome;
use xget_core::config::XgetConfig;
use xget_core::host::FileStore;

const GH_ASSET: &str = "https://github.com/a/b/releases/download/v1/x.zip";

fn config(dir: &tempfile::TempDir) -> XgetConfig {
    XgetConfig {
        default_mirror_domain: "mirror.example".to_string(),
        storage_path: Some(dir.path().join("storage.json")),
        ..XgetConfig::default()
    }
}

#[tokio::test]
async fn first_session_seeds_storage() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    Session::start(&cfg).await.unwrap();
    let record = FileStore::new(dir.path().join("storage.json")).load().unwrap();
    assert_eq!(record["xgetDomain"], "mirror.example");
    assert_eq!(record["enabled"], true);
}

#[tokio::test]
async fn transform_uses_stored_domain_or_override() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::start(&config(&dir)).await.unwrap();

    let url = run_transform(&session, GH_ASSET, None).await.unwrap();
    assert_eq!(url, "https://mirror.example/gh/a/b/releases/download/v1/x.zip");

    let url = run_transform(&session, GH_ASSET, Some("other.example")).await.unwrap();
    assert_eq!(url, "https://other.example/gh/a/b/releases/download/v1/x.zip");

    assert!(run_transform(&session, "https://example.com/x.zip", None).await.is_err());
}

#[tokio::test]
async fn settings_changes_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let session = Session::start(&cfg).await.unwrap();
    run_settings(
        &session,
        &cfg,
        SettingsAction::SetDomain {
            domain: "https://fast.example/".to_string(),
        },
    )
    .await
    .unwrap();
    run_settings(
        &session,
        &cfg,
        SettingsAction::Platform {
            key: "npm".to_string(),
            state: Switch::Off,
        },
    )
    .await
    .unwrap();

    let next = Session::start(&cfg).await.unwrap();
    let url = run_transform(&next, GH_ASSET, None).await.unwrap();
    assert_eq!(url, "https://fast.example/gh/a/b/releases/download/v1/x.zip");
    let err = run_transform(&next, "https://registry.npmjs.org/left-pad/-/left-pad-1.3.0.tgz", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not on an enabled platform"));
}

#[tokio::test]
async fn enabling_without_domain_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let session = Session::start(&cfg).await.unwrap();
    run_settings(
        &session,
        &cfg,
        SettingsAction::SetDomain {
            domain: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(run_settings(&session, &cfg, SettingsAction::Enable).await.is_err());
}

#[tokio::test]
async fn download_is_redirected_then_left_alone_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let session = Session::start(&cfg).await.unwrap();

    let outcome = run_download(&session, GH_ASSET.to_string(), Some("x.zip".to_string()), 1, None)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        DownloadOutcome::Redirected {
            url: "https://mirror.example/gh/a/b/releases/download/v1/x.zip".to_string(),
            cancelled: true,
            relaunched: true,
        }
    );

    run_settings(&session, &cfg, SettingsAction::Disable).await.unwrap();
    let outcome = run_download(&session, GH_ASSET.to_string(), None, 2, None)
        .await
        .unwrap();
    assert_eq!(outcome, DownloadOutcome::NotApplicable);
}
