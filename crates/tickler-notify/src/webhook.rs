//! Generic JSON webhook delivery: `POST <url>` with `{"text": "..."}`.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::NotifyError;
use crate::sink::NotificationSink;

pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }
        debug!(url = %self.url, "webhook: message delivered");
        Ok(())
    }
}
