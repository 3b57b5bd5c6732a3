use std::io::{Cursor, Write};
use std::path::Path;

use layout_fetch::{
    DEFAULT_GEOMETRY, FetchError, InstallRequest, LayoutRef, ScratchMode, run,
};
use layout_fetch_oryx::{OryxClient, OryxClientConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

const ARCHIVE_PATH: &str = "/layouts/zsa_ergodox_ez_my_layout_lzxz0_AZjZE.zip";

/// Build a .zip in memory with the given (path, content) entries.
fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

async fn mount_layout(server: &MockServer, archive: Vec<u8>) {
    let zip_url = format!("{}{ARCHIVE_PATH}", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "Layout": {
                    "title": "my layout",
                    "revision": { "hashId": "AZjZE", "zipUrl": zip_url }
                }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(archive, "application/zip"))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> OryxClient {
    OryxClient::new(OryxClientConfig {
        endpoint: Some(format!("{}/graphql", server.uri())),
        ..OryxClientConfig::default()
    })
    .unwrap()
}

fn request(repo_root: &Path) -> InstallRequest {
    InstallRequest::new(
        LayoutRef::latest("lzxz0", DEFAULT_GEOMETRY),
        repo_root,
        "ergodox_ez/shine",
        "my_layout",
    )
}

#[tokio::test]
async fn installs_layout_into_keymap_folder() {
    let server = MockServer::start().await;
    mount_layout(
        &server,
        build_zip(&[
            ("zsa_ergodox_ez_my_layout_source/keymap.c", "// keymap"),
            ("zsa_ergodox_ez_my_layout_source/config.h", "#define ORYX_CONFIGURATOR"),
            ("zsa_ergodox_ez_my_layout_source/rules.mk", "ORYX_ENABLE = yes"),
            ("zsa_ergodox_ez_my_layout_lzxz0_AZjZE.hex", ":00000001FF"),
        ]),
    )
    .await;

    let repo = tempfile::tempdir().unwrap();
    let client = client_for(&server);
    let report = run(&client, &client, &request(repo.path())).await.unwrap();

    let keymap = repo
        .path()
        .join("keyboards/ergodox_ez/shine/keymaps/my_layout");
    assert_eq!(report.destination, keymap);
    assert_eq!(report.files_installed, 3);
    assert_eq!(
        std::fs::read_to_string(keymap.join("config.h")).unwrap(),
        "#define ORYX_CONFIGURATOR"
    );
    assert!(keymap.join("keymap.c").is_file());
    assert!(keymap.join("rules.mk").is_file());
    assert!(report.scratch_kept.is_none());
}

#[tokio::test]
async fn overlays_existing_keymap() {
    let server = MockServer::start().await;
    mount_layout(
        &server,
        build_zip(&[("zsa_ergodox_ez_my_layout_source/keymap.c", "C")]),
    )
    .await;

    let repo = tempfile::tempdir().unwrap();
    let keymap = repo
        .path()
        .join("keyboards/ergodox_ez/shine/keymaps/my_layout");
    std::fs::create_dir_all(&keymap).unwrap();
    std::fs::write(keymap.join("keymap.c"), "A").unwrap();
    std::fs::write(keymap.join("config.h"), "B").unwrap();

    let client = client_for(&server);
    run(&client, &client, &request(repo.path())).await.unwrap();

    assert_eq!(std::fs::read_to_string(keymap.join("keymap.c")).unwrap(), "C");
    assert_eq!(std::fs::read_to_string(keymap.join("config.h")).unwrap(), "B");
}

#[tokio::test]
async fn keeps_scratch_when_asked() {
    let server = MockServer::start().await;
    mount_layout(
        &server,
        build_zip(&[("zsa_ergodox_ez_my_layout_source/keymap.c", "// keymap")]),
    )
    .await;

    let repo = tempfile::tempdir().unwrap();
    let scratch = repo.path().join("tmp");
    let client = client_for(&server);
    let report = run(
        &client,
        &client,
        &request(repo.path()).with_scratch(ScratchMode::Keep(scratch.clone())),
    )
    .await
    .unwrap();

    assert_eq!(report.scratch_kept, Some(scratch.clone()));
    assert!(scratch.join("zsa_ergodox_ez_my_layout_lzxz0_AZjZE.zip").is_file());
}

#[tokio::test]
async fn renamed_archive_directory_fails_at_install_step() {
    let server = MockServer::start().await;
    mount_layout(&server, build_zip(&[("something_else/keymap.c", "// keymap")])).await;

    let repo = tempfile::tempdir().unwrap();
    let client = client_for(&server);
    let result = run(&client, &client, &request(repo.path())).await;

    assert!(matches!(result, Err(FetchError::Filesystem(_))));
    assert!(!repo.path().join("keyboards").exists());
}

#[tokio::test]
async fn missing_archive_fails_at_download_step() {
    let server = MockServer::start().await;
    let zip_url = format!("{}{ARCHIVE_PATH}", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "Layout": { "revision": { "zipUrl": zip_url } } }
        })))
        .mount(&server)
        .await;

    let repo = tempfile::tempdir().unwrap();
    let client = client_for(&server);
    let result = run(&client, &client, &request(repo.path())).await;

    assert!(matches!(result, Err(FetchError::Download(_))));
    assert!(!repo.path().join("keyboards").exists());
}
