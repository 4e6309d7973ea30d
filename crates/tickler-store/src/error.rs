use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected before anything is written (e.g. blank todo text).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("todo not found: {id}")]
    NotFound { id: String },

    /// The backing database failed or its connection lock was poisoned.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl StoreError {
    /// Short error code string sent to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidInput(_) => "INVALID_INPUT",
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::Unavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
