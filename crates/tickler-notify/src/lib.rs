//! `tickler-notify`: outbound delivery of reminder digests.
//!
//! Everything that talks to the outside world sits behind [`NotificationSink`].
//! Sinks report failures and never retry; retry policy belongs to whoever
//! operates the endpoint.

pub mod error;
pub mod send;
pub mod sink;
pub mod telegram;
pub mod webhook;

pub use error::NotifyError;
pub use sink::{from_config, DisabledSink, NotificationSink};
pub use telegram::TelegramSink;
pub use webhook::WebhookSink;
