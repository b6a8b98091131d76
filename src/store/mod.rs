pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus, NotificationRecord, ReadReceipt};
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an application for this job and candidate already exists")]
    Duplicate,

    #[error("invalid reference: {0}")]
    InvalidReference(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for applications and the users/jobs they reference.
/// Implementations: `PgStore` (Postgres), `MemoryStore` (in-process).
///
/// Every mutation is a single conditional update: the precondition and the
/// write happen atomically, so concurrent callers cannot both match.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Create an application for a student. The company is taken from the job.
    async fn create_application(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<Application>;

    /// Apply a company's review to one of its undecided applications.
    /// Returns `None` if the application does not exist, belongs to another
    /// company, or already carries a final decision.
    async fn record_review(
        &self,
        application_id: Uuid,
        company_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Option<Application>>;

    /// Decided, sent and unread applications of a candidate, most recent review first.
    async fn list_unread_notifications(&self, candidate_id: Uuid) -> StoreResult<Vec<NotificationRecord>>;

    /// Flip `notification_read` for one sent, unread application owned by the candidate.
    async fn mark_notification_read(
        &self,
        application_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<ReadReceipt>>;
}
