use std::sync::Arc;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::middleware::session::require_session;
use crate::middleware::{handle_panic, request_id_middleware, security_headers_middleware};
use crate::AppState;

pub mod handlers;

/// Build the full HTTP application.
///
/// Route table: every entry binds method, path, auth requirement and handler.
/// Routes under the `require_session` layer receive a `Principal`; role checks
/// happen in the notification services.
pub fn router(state: Arc<AppState>) -> Router {
    let authenticated = Router::new()
        .route(
            "/api/applications/notifications",
            get(handlers::list_notifications),
        )
        .route(
            "/api/applications/notifications/mark-read/:application_id",
            put(handlers::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let public = Router::new().route("/api/health", get(handlers::health));

    let cors = cors_layer(&state.config.frontend_origin);

    Router::new()
        .merge(public)
        .merge(authenticated)
        .fallback(fallback_404)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
}

async fn fallback_404() -> AppError {
    AppError::NotFound("Route not found.")
}

/// Credentialed CORS for the single configured frontend origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        // NOTE: AllowHeaders::any() is rejected together with allow_credentials(true)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true);

    if crate::config::validate_origin(origin).is_err() {
        tracing::warn!("wildcard FRONTEND_ORIGIN cannot carry credentials, CORS disabled");
        return layer;
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("invalid FRONTEND_ORIGIN '{}', CORS disabled", origin);
            layer
        }
    }
}
