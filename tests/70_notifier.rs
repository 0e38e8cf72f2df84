use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use estudiantes_api::config::MiddlewareConfig;
use estudiantes_api::notifier::{ChangeNotifier, HttpNotifier, NotifyError};
use estudiantes_api::types::Operation;

type Captured = Arc<Mutex<Vec<(String, Value)>>>;

/// Throwaway middleware that records what it is sent and answers `status`.
async fn spawn_middleware(status: StatusCode) -> Result<(String, Captured)> {
    let captured: Captured = Arc::default();

    async fn record(State((captured, path, status)): State<(Captured, &'static str, StatusCode)>, Json(body): Json<Value>) -> StatusCode {
        captured.lock().unwrap().push((path.to_string(), body));
        status
    }

    let app = Router::new()
        .route("/sync", post(record).with_state((captured.clone(), "/sync", status)))
        .route("/notify-online", post(record).with_state((captured.clone(), "/notify-online", status)));

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://127.0.0.1:{}/", port), captured))
}

fn config(base_url: String) -> MiddlewareConfig {
    MiddlewareConfig {
        base_url,
        timeout_secs: 2,
        source: "estudiantes".to_string(),
    }
}

#[tokio::test]
async fn change_events_are_posted_to_sync() -> Result<()> {
    let (base_url, captured) = spawn_middleware(StatusCode::OK).await?;
    let notifier = HttpNotifier::new(&config(base_url))?;

    let data = json!({ "id_": "a", "id_estudiantes": "b", "nombre": "Ana", "version": 1 });
    notifier.notify(Operation::Create, "estudiantes", &data).await?;

    let captured = captured.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    let (path, body) = &captured[0];
    assert_eq!(path, "/sync");
    assert_eq!(body["operation"], "CREATE");
    assert_eq!(body["table"], "estudiantes");
    assert_eq!(body["data"], data);
    assert_eq!(body["source"], "estudiantes");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    Ok(())
}

#[tokio::test]
async fn online_announcement() -> Result<()> {
    let (base_url, captured) = spawn_middleware(StatusCode::OK).await?;
    let notifier = HttpNotifier::new(&config(base_url))?;

    notifier.notify_online().await?;

    let captured = captured.lock().unwrap().clone();
    let (path, body) = &captured[0];
    assert_eq!(path, "/notify-online");
    assert_eq!(body["server"], "estudiantes");
    assert_eq!(body["status"], "online");
    Ok(())
}

#[tokio::test]
async fn rejected_event_is_a_status_error() -> Result<()> {
    let (base_url, _captured) = spawn_middleware(StatusCode::SERVICE_UNAVAILABLE).await?;
    let notifier = HttpNotifier::new(&config(base_url))?;

    let err = notifier
        .notify(Operation::Delete, "matriculas", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Status { status: 503, .. }), "{}", err);
    Ok(())
}
