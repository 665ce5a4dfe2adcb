pub mod accounts;
pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notion;
pub mod services;
pub mod testing;
pub mod types;

pub use app::{app, AppState};
