#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use estudiantes_api::database::MemoryStore;
use estudiantes_api::routes;
use estudiantes_api::state::AppState;
use estudiantes_api::testing::{fixtures, RecordingNotifier};

/// The real router served in-process over a fresh in-memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub catalog: fixtures::Catalog,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn spawn(static_dir: &Path, notifier: RecordingNotifier) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let catalog = fixtures::seed_catalog(&store);
        let notifier = Arc::new(notifier);
        let state = AppState::new(store.clone(), notifier.clone());

        let app = routes::app(state, static_dir);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            store,
            notifier,
            catalog,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/status", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /estudiantes and return the created body.
    pub async fn create_estudiante(&self, nombre: &str) -> Result<serde_json::Value> {
        let res = self
            .client
            .post(self.url("/estudiantes"))
            .json(&serde_json::json!({ "nombre": nombre }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create estudiante: {}", res.status());
        Ok(res.json().await?)
    }

    /// POST /matriculas and return the created body.
    pub async fn create_matricula(&self, id_estudiantes: &str, id_asignacion: &str) -> Result<serde_json::Value> {
        let res = self
            .client
            .post(self.url("/matriculas"))
            .json(&serde_json::json!({
                "id_estudiantes": id_estudiantes,
                "id_profesores_ciclos_asignaturas": id_asignacion,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create matricula: {}", res.status());
        Ok(res.json().await?)
    }
}

/// Start a server whose static fallback points at a directory that does not exist.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with_static(Path::new("./does-not-exist")).await
}

pub async fn spawn_server_with_static(static_dir: &Path) -> Result<TestServer> {
    start(static_dir, RecordingNotifier::new()).await
}

/// Start a server whose notifier records every event and then reports it undelivered.
pub async fn spawn_server_with_failing_notifier() -> Result<TestServer> {
    start(Path::new("./does-not-exist"), RecordingNotifier::failing()).await
}

async fn start(static_dir: &Path, notifier: RecordingNotifier) -> Result<TestServer> {
    let server = TestServer::spawn(static_dir, notifier).await?;
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Assert a plain-text error response and return nothing else.
pub async fn assert_text_error(res: reqwest::Response, status: StatusCode, message: &str) -> Result<()> {
    assert_eq!(res.status(), status, "unexpected status for {:?}", message);
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "content type was {}", content_type);
    assert_eq!(res.text().await?, format!("{}\n", message));
    Ok(())
}
