use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::ErrorKind;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    QueryExecution(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl AppError {
    /// Human-readable category reported in the `error` field of a response body.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "Configuration error",
            AppError::Connection(_) => "Database connection error",
            AppError::QueryExecution(_) => "Query execution error",
            AppError::Internal(_) => "Internal server error",
            AppError::NotFound => "not found",
        }
    }

    /// The underlying detail, without the category prefix.
    pub fn detail(&self) -> String {
        match self {
            AppError::Configuration(msg)
            | AppError::Connection(msg)
            | AppError::QueryExecution(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::NotFound => String::new(),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => AppError::Connection(err.to_string()),
            _ => AppError::QueryExecution(err.to_string()),
        }
    }
}

impl From<bson::de::Error> for AppError {
    fn from(err: bson::de::Error) -> Self {
        AppError::QueryExecution(format!("unexpected result row: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::NotFound = self {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
        }

        error!("{self}");
        let body = Json(json!({
            "error": self.category(),
            "message": self.detail(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Renders a handler panic with the same body as any other internal failure.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "not found" }));
    }

    #[tokio::test]
    async fn test_connection_error_body() {
        let response = AppError::Connection("server selection timeout".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Database connection error",
                "message": "server selection timeout",
            })
        );
    }

    #[tokio::test]
    async fn test_query_error_body() {
        let response = AppError::QueryExecution("$hour requires a date".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Query execution error");
        assert_eq!(body["message"], "$hour requires a date");
    }

    #[tokio::test]
    async fn test_panic_payload_is_reported() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "boom");
    }

    #[test]
    fn test_decode_error_is_query_error() {
        let doc = bson::doc! { "total_Viajes": "many" };
        let err: bson::de::Error = bson::from_document::<crate::models::DailySummary>(doc)
            .expect_err("string count must not decode");
        assert!(matches!(AppError::from(err), AppError::QueryExecution(_)));
    }
}
