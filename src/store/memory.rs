//! In-process store backed by `DashMap`.
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Each
//! conditional update runs under the entry's shard lock, which gives the same
//! check-and-set atomicity the Postgres `UPDATE ... WHERE` provides.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{ApplicationStore, StoreError, StoreResult};
use crate::models::application::{Application, ApplicationStatus, NotificationRecord, ReadReceipt};
use crate::models::job::Job;
use crate::models::user::User;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    jobs: DashMap<Uuid, Job>,
    applications: DashMap<Uuid, Application>,
    /// (job_id, candidate_id) -> application id
    pairs: DashMap<(Uuid, Uuid), Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_job(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    pub fn get_application(&self, id: Uuid) -> Option<Application> {
        self.applications.get(&id).map(|a| a.value().clone())
    }

    /// `record_review` with an explicit clock.
    pub fn record_review_at(
        &self,
        application_id: Uuid,
        company_id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Option<Application> {
        let mut app = self.applications.get_mut(&application_id)?;
        if app.company_id != company_id || app.status.is_decision() {
            return None;
        }

        app.status = status;
        if status.is_decision() {
            app.notification_sent = true;
            app.reviewed_at = Some(now);
        }
        app.updated_at = now;
        Some(app.clone())
    }

    /// `mark_notification_read` with an explicit clock.
    pub fn mark_notification_read_at(
        &self,
        application_id: Uuid,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<ReadReceipt> {
        let mut app = self.applications.get_mut(&application_id)?;
        if app.candidate_id != candidate_id || !app.notification_sent || app.notification_read {
            return None;
        }

        app.notification_read = true;
        app.updated_at = now;
        Some(ReadReceipt {
            id: app.id,
            status: app.status,
            notification_read: app.notification_read,
        })
    }

    fn to_record(&self, app: &Application) -> Option<NotificationRecord> {
        let job = self.jobs.get(&app.job_id)?;
        let company = self.users.get(&app.company_id)?;
        Some(NotificationRecord {
            id: app.id,
            status: app.status,
            job_title: job.title.clone(),
            company_name: company.company_name.clone(),
            company_industry: company.industry.clone(),
            company_logo: company.profile_picture.clone(),
            created_at: app.created_at,
            updated_at: app.updated_at,
            reviewed_at: app.reviewed_at,
        })
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn create_application(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<Application> {
        let company_id = self
            .jobs
            .get(&job_id)
            .map(|j| j.company_id)
            .ok_or(StoreError::InvalidReference("job does not exist or candidate is not a student"))?;
        let is_student = self
            .users
            .get(&candidate_id)
            .map(|u| u.role.is_student())
            .unwrap_or(false);
        if !is_student {
            return Err(StoreError::InvalidReference(
                "job does not exist or candidate is not a student",
            ));
        }

        // The pair entry stays locked until the application is inserted.
        match self.pairs.entry((job_id, candidate_id)) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                let app = Application::new(job_id, candidate_id, company_id);
                self.applications.insert(app.id, app.clone());
                slot.insert(app.id);
                Ok(app)
            }
        }
    }

    async fn record_review(
        &self,
        application_id: Uuid,
        company_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Option<Application>> {
        Ok(self.record_review_at(application_id, company_id, status, Utc::now()))
    }

    async fn list_unread_notifications(&self, candidate_id: Uuid) -> StoreResult<Vec<NotificationRecord>> {
        let mut records: Vec<NotificationRecord> = self
            .applications
            .iter()
            .filter(|a| a.candidate_id == candidate_id && a.has_unread_notification())
            .filter_map(|a| self.to_record(a.value()))
            .collect();

        // None sorts below Some, so unstamped reviews land last.
        records.sort_by(|a, b| {
            b.reviewed_at
                .cmp(&a.reviewed_at)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(records)
    }

    async fn mark_notification_read(
        &self,
        application_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<ReadReceipt>> {
        Ok(self.mark_notification_read_at(application_id, candidate_id, Utc::now()))
    }
}
