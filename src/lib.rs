//! FireTrack - volunteer fire brigade record keeping
//!
//! REST JSON API for the unit's members, vehicles, equipment, events,
//! check-out book and control log, with live collection subscriptions.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod names;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
