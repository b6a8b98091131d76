//! Read path: turn a student's decided, unread applications into notification views.
//!
//! Notifications are not persisted. Every request re-derives them from the
//! application records, so the feed always reflects the current read state.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, NotificationRecord};
use crate::models::user::Principal;
use crate::store::ApplicationStore;

/// Decisions younger than this many hours are flagged `isNew`.
pub const NEW_WINDOW_HOURS: i64 = 24;

fn new_window() -> Duration {
    Duration::hours(NEW_WINDOW_HOURS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusNotification {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub status: ApplicationStatus,
    pub job_title: String,
    pub company_name: Option<String>,
    pub company_industry: Option<String>,
    pub company_logo: Option<String>,
    pub application_date: DateTime<Utc>,
    pub reviewed_date: DateTime<Utc>,
    pub is_new: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub new: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    pub notifications: Vec<StatusNotification>,
    pub stats: NotificationStats,
}

/// Render one record. Returns `None` for statuses that never notify.
pub fn project(record: NotificationRecord, now: DateTime<Utc>) -> Option<StatusNotification> {
    let company = record.company_name.as_deref().unwrap_or("the company");
    let (message, kind) = match record.status {
        ApplicationStatus::Accepted => (
            format!(
                "Congratulations! Your application for \"{}\" has been accepted by {}.",
                record.job_title, company
            ),
            NotificationKind::Success,
        ),
        ApplicationStatus::Rejected => (
            format!(
                "Your application for \"{}\" at {} has been reviewed but not selected for this position.",
                record.job_title, company
            ),
            NotificationKind::Info,
        ),
        ApplicationStatus::Ignored | ApplicationStatus::Interested => return None,
    };

    let reviewed_date = record.decided_at();
    Some(StatusNotification {
        id: record.id,
        message,
        kind,
        status: record.status,
        job_title: record.job_title,
        company_name: record.company_name,
        company_industry: record.company_industry,
        company_logo: record.company_logo,
        application_date: record.created_at,
        reviewed_date,
        is_new: reviewed_date > now - new_window(),
    })
}

impl NotificationStats {
    pub fn from_notifications(notifications: &[StatusNotification]) -> Self {
        notifications.iter().fold(Self::default(), |mut stats, n| {
            stats.total += 1;
            match n.status {
                ApplicationStatus::Accepted => stats.accepted += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                _ => {}
            }
            if n.is_new {
                stats.new += 1;
            }
            stats
        })
    }
}

/// All unread status notifications of the calling student. Pure read.
pub async fn list_unread(
    store: &dyn ApplicationStore,
    principal: &Principal,
    now: DateTime<Utc>,
) -> Result<NotificationFeed, AppError> {
    if !principal.role.is_student() {
        return Err(AppError::PermissionDenied(
            "Only students can access application notifications.",
        ));
    }

    let records = store
        .list_unread_notifications(principal.id)
        .await
        .map_err(|e| AppError::internal("Server error while fetching notifications.", e))?;

    let notifications: Vec<StatusNotification> = records
        .into_iter()
        .filter_map(|r| project(r, now))
        .collect();
    let stats = NotificationStats::from_notifications(&notifications);

    tracing::debug!(
        student_id = %principal.id,
        total = stats.total,
        new = stats.new,
        "listed unread notifications"
    );

    Ok(NotificationFeed { notifications, stats })
}
