//! Write path: acknowledge a single notification.
//!
//! `sent,unread -> sent,read` is the only transition and it is terminal.
//! Repeating it on the same application reports `NotFound`.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ReadReceipt;
use crate::models::user::Principal;
use crate::store::ApplicationStore;

pub async fn mark_read(
    store: &dyn ApplicationStore,
    principal: &Principal,
    raw_application_id: &str,
) -> Result<ReadReceipt, AppError> {
    if !principal.role.is_student() {
        return Err(AppError::PermissionDenied(
            "Only students can mark notifications as read.",
        ));
    }

    let application_id = Uuid::parse_str(raw_application_id)
        .map_err(|_| AppError::InvalidArgument("Invalid application ID format."))?;

    let receipt = store
        .mark_notification_read(application_id, principal.id)
        .await
        .map_err(|e| AppError::internal("Server error while updating notification.", e))?;

    match receipt {
        Some(receipt) => {
            tracing::info!(
                application_id = %receipt.id,
                student_id = %principal.id,
                "notification marked as read"
            );
            Ok(receipt)
        }
        None => Err(AppError::NotFound("Notification not found or already read.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::Job;
    use crate::models::user::{Role, User};
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_company_cannot_mark_read() {
        let store = MemoryStore::new();
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::Company,
        };
        let err = mark_read(&store, &principal, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid_argument() {
        let store = MemoryStore::new();
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::Student,
        };
        let err = mark_read(&store, &principal, "not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_second_mark_read_is_not_found() {
        let store = MemoryStore::new();
        let student = User::student(Uuid::new_v4());
        let company = User::company(Uuid::new_v4(), "Acme", "Software");
        let job = Job {
            id: Uuid::new_v4(),
            title: "Backend Intern".into(),
            company_id: company.id,
        };
        let principal = Principal::from(&student);
        store.insert_user(student);
        store.insert_user(company.clone());
        store.insert_job(job.clone());

        let app = store.create_application(job.id, principal.id).await.unwrap();
        store
            .record_review(app.id, company.id, ApplicationStatus::Accepted)
            .await
            .unwrap();

        let receipt = mark_read(&store, &principal, &app.id.to_string()).await.unwrap();
        assert_eq!(receipt.id, app.id);
        assert_eq!(receipt.status, ApplicationStatus::Accepted);
        assert!(receipt.notification_read);

        let err = mark_read(&store, &principal, &app.id.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
