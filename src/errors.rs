use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap a persistence or unexpected fault; `message` is what the client sees.
    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let msg = match &self {
            AppError::Unauthenticated => "Please login.",
            AppError::PermissionDenied(msg) => {
                tracing::warn!("permission denied: {}", msg);
                *msg
            }
            AppError::NotFound(msg) | AppError::InvalidArgument(msg) => *msg,
            AppError::Internal { message, source } => {
                tracing::error!("{}: {:#}", message, source);
                *message
            }
        };

        let body = Json(json!({
            "success": false,
            "message": msg,
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::PermissionDenied("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidArgument("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("boom", anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_hides_source_from_client() {
        let err = AppError::internal("Server error while fetching notifications.", anyhow::anyhow!("connection reset"));
        assert!(err.to_string().contains("connection reset"));

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("connection reset"));

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Server error while fetching notifications.");
    }
}
