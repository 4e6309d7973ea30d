//! Telegram delivery via the Bot API.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::send::{escape_markdown_v2, split_chunks, CHUNK_MAX};
use crate::sink::NotificationSink;

/// Sends messages to a single Telegram chat.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        Self::with_bot(Bot::new(bot_token), chat_id)
    }

    /// Use an already configured bot, e.g. one pointed at a different API URL.
    pub fn with_bot(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    fn name(&self) -> &str {
        "telegram"
    }

    /// Send `text` in chunks of at most 4090 characters.
    ///
    /// Each chunk goes out as MarkdownV2 first; if Telegram rejects the parse
    /// mode the chunk is re-sent as plain text. Only a failed plain-text send
    /// is reported as an error. A 100ms delay separates consecutive chunks.
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let chunks = split_chunks(text, CHUNK_MAX);
        for (i, chunk) in chunks.iter().enumerate() {
            let escaped = escape_markdown_v2(chunk);
            let sent = self
                .bot
                .send_message(self.chat_id, escaped)
                .parse_mode(ParseMode::MarkdownV2)
                .await;

            if let Err(e) = sent {
                debug!(error = %e, chunk_index = i, "telegram: MarkdownV2 rejected, retrying as plain text");
                if let Err(e) = self.bot.send_message(self.chat_id, chunk.as_str()).await {
                    warn!(error = %e, chunk_index = i, "telegram: plain-text send failed");
                    return Err(e.into());
                }
            }

            if i + 1 < chunks.len() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        debug!(chat_id = self.chat_id.0, chunks = chunks.len(), "telegram: message delivered");
        Ok(())
    }
}
