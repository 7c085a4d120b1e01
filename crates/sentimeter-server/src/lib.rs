//! Sentimeter Server
//!
//! HTTP API for sentiment prediction over short feedback texts.
//!
//! Every prediction is persisted, and stored feedback can be listed,
//! filtered by label, deleted and summarised.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use app::build_app;
pub use config::{HttpConfig, ServerConfig};
pub use error::AppError;
pub use state::AppState;
