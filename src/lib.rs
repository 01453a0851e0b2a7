pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod validation;

pub use app::{create_router, AppState};
pub use config::AppConfig;
