use std::sync::Arc;

use async_trait::async_trait;
use tickler_core::config::NotifyConfig;
use tracing::{info, warn};

use crate::error::NotifyError;
use crate::telegram::TelegramSink;
use crate::webhook::WebhookSink;

/// Delivers one formatted text message to an external endpoint.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Deliver `text`. A returned error means the endpoint did not accept it.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Stand-in used when no endpoint is configured; every send fails.
pub struct DisabledSink;

#[async_trait]
impl NotificationSink for DisabledSink {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

/// Pick the sink described by config.
///
/// Telegram wins when both Telegram and a webhook are configured.
pub fn from_config(config: &NotifyConfig) -> Arc<dyn NotificationSink> {
    if let Some(ref telegram) = config.telegram {
        info!(chat_id = telegram.chat_id, "notification sink: telegram");
        return Arc::new(TelegramSink::new(&telegram.bot_token, telegram.chat_id));
    }
    if let Some(ref webhook) = config.webhook {
        info!(url = %webhook.url, "notification sink: webhook");
        return Arc::new(WebhookSink::new(webhook.url.clone()));
    }
    warn!("no notification endpoint configured: reminders will not be delivered");
    Arc::new(DisabledSink)
}
