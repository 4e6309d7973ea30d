pub mod admin;
pub mod api;
pub mod health;
pub mod notify;
pub mod todos;
pub mod ui;
