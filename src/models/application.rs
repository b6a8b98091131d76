use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A candidate's application to a job. One row per (job, candidate) pair.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub company_id: Uuid,
    pub status: ApplicationStatus,
    /// Set once a status decision has been communicated to the candidate.
    pub notification_sent: bool,
    /// Set once the candidate acknowledged the decision. Implies `notification_sent`.
    pub notification_read: bool,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Build a fresh, unreviewed application.
    pub fn new(job_id: Uuid, candidate_id: Uuid, company_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            company_id,
            status: ApplicationStatus::default(),
            notification_sent: false,
            notification_read: false,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the application has a decision the candidate has not acknowledged yet.
    pub fn has_unread_notification(&self) -> bool {
        self.status.is_decision() && self.notification_sent && !self.notification_read
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Ignored,
    Interested,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Accepted and rejected are final decisions and the only statuses that notify.
    pub fn is_decision(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Ignored => "ignored",
            ApplicationStatus::Interested => "interested",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignored" => Ok(ApplicationStatus::Ignored),
            "interested" => Ok(ApplicationStatus::Interested),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{}'", other)),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application joined with its job and company, as needed to render a notification.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub job_title: String,
    pub company_name: Option<String>,
    pub company_industry: Option<String>,
    pub company_logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    /// When the decision happened: the review time, or the last update if it was never stamped.
    pub fn decided_at(&self) -> DateTime<Utc> {
        self.reviewed_at.unwrap_or(self.updated_at)
    }
}

/// Result of a successful mark-read transition.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub notification_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_defaults() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(app.status, ApplicationStatus::Ignored);
        assert!(!app.notification_sent);
        assert!(!app.notification_read);
        assert!(app.reviewed_at.is_none());
        assert_eq!(app.created_at, app.updated_at);
        assert!(!app.has_unread_notification());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("accepted".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Accepted));
        assert_eq!("Rejected".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Rejected));
        assert_eq!("ignored".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Ignored));
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_only_accept_and_reject_are_decisions() {
        assert!(ApplicationStatus::Accepted.is_decision());
        assert!(ApplicationStatus::Rejected.is_decision());
        assert!(!ApplicationStatus::Ignored.is_decision());
        assert!(!ApplicationStatus::Interested.is_decision());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(ApplicationStatus::Interested).unwrap();
        assert_eq!(json, "interested");
    }

    #[test]
    fn test_interested_with_flags_is_not_unread_notification() {
        let mut app = Application::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        app.status = ApplicationStatus::Interested;
        app.notification_sent = true;
        assert!(!app.has_unread_notification());

        app.status = ApplicationStatus::Accepted;
        assert!(app.has_unread_notification());

        app.notification_read = true;
        assert!(!app.has_unread_notification());
    }

    #[test]
    fn test_decided_at_falls_back_to_updated_at() {
        let now = Utc::now();
        let mut record = NotificationRecord {
            id: Uuid::new_v4(),
            status: ApplicationStatus::Accepted,
            job_title: "Backend Intern".into(),
            company_name: Some("Acme".into()),
            company_industry: None,
            company_logo: None,
            created_at: now - chrono::Duration::days(3),
            updated_at: now,
            reviewed_at: None,
        };
        assert_eq!(record.decided_at(), now);

        let reviewed = now - chrono::Duration::hours(2);
        record.reviewed_at = Some(reviewed);
        assert_eq!(record.decided_at(), reviewed);
    }
}
