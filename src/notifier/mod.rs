//! Change notifier: pushes every mutation to the external sync middleware.
//!
//! Delivery is a single POST per event, awaited inline by the handler. There
//! is no retry and no queue; a failed delivery is logged and dropped, and it
//! never alters the HTTP response being built.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MiddlewareConfig;
use crate::types::Operation;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
}

/// Body posted to `<base>/sync`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent<'a> {
    pub operation: Operation,
    pub table: &'a str,
    pub data: &'a Value,
    pub source: &'a str,
    pub timestamp: String,
}

/// Body posted to `<base>/notify-online` once the server is listening.
#[derive(Debug, Clone, Serialize)]
pub struct OnlineEvent<'a> {
    pub server: &'a str,
    pub status: &'static str,
    pub timestamp: String,
}

#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn notify(&self, operation: Operation, table: &str, data: &Value) -> Result<(), NotifyError>;

    async fn notify_online(&self) -> Result<(), NotifyError>;
}

/// Local time, RFC 3339 with offset, whole seconds.
pub fn timestamp() -> String {
    chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serialize `entity`, deliver it, and log the result. Errors stop here.
pub async fn notify_logged<T: Serialize>(
    notifier: &dyn ChangeNotifier,
    operation: Operation,
    table: &str,
    entity: &T,
) {
    let data = match serde_json::to_value(entity) {
        Ok(data) => data,
        Err(e) => {
            warn!("Could not encode {} event for {}: {}", operation, table, e);
            return;
        }
    };

    match notifier.notify(operation, table, &data).await {
        Ok(()) => info!("Operation {} on table {} sent to middleware", operation, table),
        Err(e) => warn!("Operation {} on table {} not delivered: {}", operation, table, e),
    }
}

/// reqwest-backed notifier with a per-request timeout.
#[derive(Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    sync_url: String,
    online_url: String,
    source: String,
}

impl HttpNotifier {
    pub fn new(config: &MiddlewareConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| NotifyError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            sync_url: config.sync_url(),
            online_url: config.online_url(),
            source: config.source.clone(),
        })
    }

    // Encoding failures surface from `send` as builder errors.
    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| NotifyError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeNotifier for HttpNotifier {
    async fn notify(&self, operation: Operation, table: &str, data: &Value) -> Result<(), NotifyError> {
        let event = ChangeEvent {
            operation,
            table,
            data,
            source: &self.source,
            timestamp: timestamp(),
        };
        self.post(&self.sync_url, &event).await
    }

    async fn notify_online(&self) -> Result<(), NotifyError> {
        let event = OnlineEvent {
            server: &self.source,
            status: "online",
            timestamp: timestamp(),
        };
        self.post(&self.online_url, &event).await?;
        info!("Middleware notified that {} is online", self.source);
        Ok(())
    }
}
