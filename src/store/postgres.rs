use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ApplicationStore, StoreError, StoreResult};
use crate::models::application::{Application, ApplicationStatus, NotificationRecord, ReadReceipt};
use crate::models::user::{User, UserRow};

const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, company_id, status, notification_sent, \
     notification_read, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, role, company_name, industry, profile_picture FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn create_application(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<Application> {
        // Company comes from the job; the join drops the row unless the candidate is a student.
        let sql = format!(
            r#"INSERT INTO applications (id, job_id, candidate_id, company_id)
               SELECT $1, j.id, u.id, j.company_id
               FROM jobs j
               JOIN users u ON u.id = $3 AND u.role = 'student'
               WHERE j.id = $2
               RETURNING {}"#,
            APPLICATION_COLUMNS
        );
        let result = sqlx::query_as::<_, Application>(&sql)
            .bind(Uuid::new_v4())
            .bind(job_id)
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(app)) => Ok(app),
            Ok(None) => Err(StoreError::InvalidReference(
                "job does not exist or candidate is not a student",
            )),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(StoreError::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_review(
        &self,
        application_id: Uuid,
        company_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Option<Application>> {
        let sql = format!(
            r#"UPDATE applications
               SET status = $3,
                   notification_sent = notification_sent OR $4,
                   reviewed_at = CASE WHEN $4 THEN NOW() ELSE reviewed_at END,
                   updated_at = NOW()
               WHERE id = $1
                 AND company_id = $2
                 AND status IN ('ignored', 'interested')
               RETURNING {}"#,
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&sql)
            .bind(application_id)
            .bind(company_id)
            .bind(status)
            .bind(status.is_decision())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_unread_notifications(&self, candidate_id: Uuid) -> StoreResult<Vec<NotificationRecord>> {
        let rows = sqlx::query_as::<_, NotificationRecord>(
            r#"SELECT a.id, a.status,
                      j.title AS job_title,
                      c.company_name,
                      c.industry AS company_industry,
                      c.profile_picture AS company_logo,
                      a.created_at, a.updated_at, a.reviewed_at
               FROM applications a
               JOIN jobs j ON j.id = a.job_id
               JOIN users c ON c.id = a.company_id
               WHERE a.candidate_id = $1
                 AND a.status IN ('accepted', 'rejected')
                 AND a.notification_sent = true
                 AND a.notification_read = false
               ORDER BY a.reviewed_at DESC NULLS LAST, a.updated_at DESC"#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_notification_read(
        &self,
        application_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<ReadReceipt>> {
        let row = sqlx::query_as::<_, ReadReceipt>(
            r#"UPDATE applications
               SET notification_read = true, updated_at = NOW()
               WHERE id = $1
                 AND candidate_id = $2
                 AND notification_sent = true
                 AND notification_read = false
               RETURNING id, status, notification_read"#,
        )
        .bind(application_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
