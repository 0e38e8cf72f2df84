mod common;

use anyhow::Result;
use reqwest::{header, Method, StatusCode};

#[tokio::test]
async fn preflight_short_circuits() -> Result<()> {
    let server = common::spawn_server().await?;

    // Even a path no handler serves gets an empty 200.
    for path in ["/estudiantes", "/nowhere"] {
        let res = server.client.request(Method::OPTIONS, server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "{}", path);
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
        assert!(res.text().await?.is_empty());
    }

    assert!(server.notifier.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn every_response_carries_cors_headers() -> Result<()> {
    let server = common::spawn_server().await?;

    let ok = server.client.get(server.url("/status")).send().await?;
    assert_eq!(ok.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let missing = server.client.get(server.url("/estudiantes/ghost")).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(missing.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    Ok(())
}

#[tokio::test]
async fn unmatched_paths_serve_static_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("index.html"), "<h1>Estudiantes</h1>")?;
    std::fs::create_dir(dir.path().join("js"))?;
    std::fs::write(dir.path().join("js").join("app.js"), "console.log('ok');")?;

    let server = common::spawn_server_with_static(dir.path()).await?;

    let res = server.client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "<h1>Estudiantes</h1>");

    let res = server.client.get(server.url("/js/app.js")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "console.log('ok');");

    let res = server.client.get(server.url("/missing.css")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // API routes still win over files.
    let res = server.client.get(server.url("/estudiantes")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
