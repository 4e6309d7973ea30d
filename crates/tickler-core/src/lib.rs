pub mod config;
pub mod error;
pub mod types;

pub use config::TicklerConfig;
pub use error::{Result, TicklerError};
pub use types::{Todo, TodoId, TodoStats};
