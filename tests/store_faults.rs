//! Router behaviour when the backing store fails or panics, and when the
//! configured frontend origin cannot be used for credentialed CORS.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use job_portal::config::Config;
use job_portal::middleware::session::issue_token;
use job_portal::models::application::{Application, ApplicationStatus, NotificationRecord, ReadReceipt};
use job_portal::models::user::User;
use job_portal::store::{ApplicationStore, StoreError, StoreResult};
use job_portal::{api, AppState};

const SECRET: &str = "test-secret";

#[derive(Clone, Copy)]
enum Fault {
    /// Application queries return a database error.
    Database,
    /// Application queries panic.
    Panic,
}

/// Resolves every user as a student so requests get past the session layer,
/// then fails on the application queries.
struct FaultyStore {
    fault: Fault,
}

impl FaultyStore {
    fn fail<T>(&self) -> StoreResult<T> {
        match self.fault {
            Fault::Database => Err(StoreError::Database(sqlx::Error::PoolClosed)),
            Fault::Panic => panic!("store exploded"),
        }
    }
}

#[async_trait]
impl ApplicationStore for FaultyStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(Some(User::student(id)))
    }

    async fn create_application(&self, _job_id: Uuid, _candidate_id: Uuid) -> StoreResult<Application> {
        self.fail()
    }

    async fn record_review(
        &self,
        _application_id: Uuid,
        _company_id: Uuid,
        _status: ApplicationStatus,
    ) -> StoreResult<Option<Application>> {
        self.fail()
    }

    async fn list_unread_notifications(&self, _candidate_id: Uuid) -> StoreResult<Vec<NotificationRecord>> {
        self.fail()
    }

    async fn mark_notification_read(
        &self,
        _application_id: Uuid,
        _candidate_id: Uuid,
    ) -> StoreResult<Option<ReadReceipt>> {
        self.fail()
    }
}

fn app_with(store: Arc<dyn ApplicationStore>, config: Config) -> Router {
    api::router(Arc::new(AppState { store, config }))
}

fn faulty_app(fault: Fault) -> Router {
    app_with(
        Arc::new(FaultyStore { fault }),
        Config {
            jwt_secret: SECRET.into(),
            ..Config::default()
        },
    )
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let token = issue_token(SECRET, Uuid::new_v4(), Duration::hours(1)).unwrap();
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn mark_read_uri() -> String {
    format!("/api/applications/notifications/mark-read/{}", Uuid::new_v4())
}

#[tokio::test]
async fn test_list_database_error_is_500_envelope() {
    let app = faulty_app(Fault::Database);
    let (status, body) = send(&app, Method::GET, "/api/applications/notifications").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error while fetching notifications.");
    assert!(!body.to_string().contains("closed"));
}

#[tokio::test]
async fn test_mark_read_database_error_is_500_envelope() {
    let app = faulty_app(Fault::Database);
    let (status, body) = send(&app, Method::PUT, &mark_read_uri()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error while updating notification.");
}

#[tokio::test]
async fn test_malformed_id_rejected_before_store_is_touched() {
    let app = faulty_app(Fault::Database);
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/applications/notifications/mark-read/not-a-uuid",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid application ID format.");
}

#[tokio::test]
async fn test_panicking_store_hits_catch_all() {
    let app = faulty_app(Fault::Panic);

    let (status, body) = send(&app, Method::GET, "/api/applications/notifications").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "store exploded");
    assert!(body.get("success").is_none());

    let (status, body) = send(&app, Method::PUT, &mark_read_uri()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "store exploded");
}

#[tokio::test]
async fn test_wildcard_origin_builds_router_without_cors() {
    let app = app_with(
        Arc::new(FaultyStore { fault: Fault::Database }),
        Config {
            jwt_secret: SECRET.into(),
            frontend_origin: "*".into(),
            ..Config::default()
        },
    );

    let req = Request::builder()
        .uri("/api/health")
        .header("origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key("access-control-allow-origin"));
}
