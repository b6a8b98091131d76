//! Job portal backend — application status tracking and student notifications.
//!
//! Students poll for decisions companies made on their applications and
//! acknowledge them one by one. Notifications are derived from application
//! records on every read; the only persisted notification state is the pair of
//! flags on the application itself.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod notification;
pub mod store;

use store::ApplicationStore;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub store: Arc<dyn ApplicationStore>,
    pub config: config::Config,
}
