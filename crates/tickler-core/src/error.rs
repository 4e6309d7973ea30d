use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicklerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TicklerError {
    /// Short error code string, used in startup logs.
    pub fn code(&self) -> &'static str {
        match self {
            TicklerError::Config(_) => "CONFIG_ERROR",
            TicklerError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, TicklerError>;
