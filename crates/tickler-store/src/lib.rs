//! `tickler-store`: SQLite persistence for [`Todo`](tickler_core::Todo) records.
//!
//! The store owns every todo. It is built from an explicit
//! [`rusqlite::Connection`] (no process-wide handle), creates its schema on
//! construction, and is closed with [`TodoStore::close`].

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::TodoStore;
