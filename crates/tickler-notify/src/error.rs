/// Errors produced while dispatching a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("teloxide error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint answered with status {status}")]
    Status { status: u16 },

    #[error("no notification endpoint configured")]
    NotConfigured,
}
