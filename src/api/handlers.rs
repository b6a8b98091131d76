use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::application::ReadReceipt;
use crate::models::user::Principal;
use crate::notification::projection::{self, NotificationStats, StatusNotification};
use crate::notification::transition;
use crate::AppState;

// ── Response DTOs ────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub success: bool,
    pub message: &'static str,
    pub notifications: Vec<StatusNotification>,
    pub stats: NotificationStats,
    pub count: usize,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub message: &'static str,
    pub application: ReadReceipt,
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "Server is running!" }))
}

/// GET /api/applications/notifications — unread status notifications of the caller
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<NotificationsResponse>, AppError> {
    let feed = projection::list_unread(state.store.as_ref(), &principal, Utc::now()).await?;
    let count = feed.notifications.len();

    Ok(Json(NotificationsResponse {
        success: true,
        message: "Unread notifications retrieved successfully",
        notifications: feed.notifications,
        stats: feed.stats,
        count,
    }))
}

/// PUT /api/applications/notifications/mark-read/:application_id
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(application_id): Path<String>,
) -> Result<Json<MarkReadResponse>, AppError> {
    let receipt = transition::mark_read(state.store.as_ref(), &principal, &application_id).await?;

    Ok(Json(MarkReadResponse {
        success: true,
        message: "Notification marked as read successfully",
        application: receipt,
    }))
}
