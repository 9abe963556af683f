//! # Samm Chat Backend
//!
//! axum service behind the chat widget: `POST /chat`, `GET /health` and the
//! widget's static bundle.

pub mod assistant;
pub mod config;
pub mod error;
pub mod handlers;
pub mod leads;
pub mod middleware;
pub mod rate_limit;
pub mod server;
pub mod threads;

pub use config::Config;
pub use error::{AppError, Result};
pub use server::{create_router, init_tracing, start_server, AppState};
