//! Local asset serving for requests no forwarding rule claims.

use std::fs;

use devproxy::config::{DevServerConfig, RuleConfig};

mod common;

fn frontend_build() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<html>frontend</html>").unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.js"), "console.log('app')").unwrap();
    dir
}

fn static_config(root: &std::path::Path, spa: bool) -> DevServerConfig {
    let mut config = DevServerConfig::default();
    config.static_files.root = root.to_path_buf();
    config.static_files.spa = spa;
    config
}

#[tokio::test]
async fn test_serves_index_and_assets() {
    let build = frontend_build();
    let (proxy_addr, shutdown) = common::start_proxy(static_config(build.path(), true)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let index = client
        .get(format!("http://{proxy_addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(index.status(), 200);
    assert_eq!(index.text().await.unwrap(), "<html>frontend</html>");

    let asset = client
        .get(format!("http://{proxy_addr}/assets/app.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(asset.status(), 200);
    assert_eq!(asset.text().await.unwrap(), "console.log('app')");

    shutdown.trigger();
}

#[tokio::test]
async fn test_spa_fallback_serves_index_for_client_routes() {
    let build = frontend_build();
    let (proxy_addr, shutdown) = common::start_proxy(static_config(build.path(), true)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .get(format!("http://{proxy_addr}/settings/profile"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "<html>frontend</html>");

    shutdown.trigger();
}

#[tokio::test]
async fn test_without_spa_fallback_client_routes_miss() {
    let build = frontend_build();
    let (proxy_addr, shutdown) = common::start_proxy(static_config(build.path(), false)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .get(format!("http://{proxy_addr}/settings/profile"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_and_forwarding_coexist() {
    let build = frontend_build();
    let (backend_addr, recorded) = common::start_recording_backend("from backend").await;

    let mut config = static_config(build.path(), true);
    config.rules = vec![RuleConfig {
        name: "api".to_string(),
        path_prefix: "/api".to_string(),
        target: format!("http://{backend_addr}"),
        change_origin: true,
        strip_prefix: Some("/api".to_string()),
    }];
    let (proxy_addr, shutdown) = common::start_proxy(config).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let api = client
        .get(format!("http://{proxy_addr}/api/items"))
        .send()
        .await
        .unwrap();
    assert_eq!(api.text().await.unwrap(), "from backend");
    assert_eq!(recorded.len(), 1);

    let page = client
        .get(format!("http://{proxy_addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(page.text().await.unwrap(), "<html>frontend</html>");
    assert_eq!(recorded.len(), 1);

    shutdown.trigger();
}
