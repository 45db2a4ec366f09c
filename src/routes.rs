use std::sync::Arc;

use axum::{Json, body::Bytes, extract, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::info;

use crate::{
    error::AppError,
    feedback::{parse_submission, submit},
    state::State,
};

pub const CONFIRMATION: &str = "Feedback received!";

pub async fn feedback_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let submission = parse_submission(&body)?;
    let record = submit(state.store.as_ref(), submission).await?;

    info!("Stored feedback {}", record.feedback_id);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": CONFIRMATION, "data": record })),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{Bytes, to_bytes},
        extract,
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };
    use serde_json::Value;

    use super::feedback_handler;
    use crate::{
        config::Config,
        database::FeedbackStore,
        error::AppError,
        feedback::Feedback,
        state::State,
    };

    #[derive(Default)]
    struct SpyStore {
        records: Mutex<Vec<Feedback>>,
    }

    #[async_trait]
    impl FeedbackStore for SpyStore {
        async fn put(&self, record: &Feedback) -> Result<(), AppError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl FeedbackStore for FailingStore {
        async fn put(&self, _record: &Feedback) -> Result<(), AppError> {
            Err(AppError::StorageFailure("connection refused".into()))
        }
    }

    fn test_state(store: Arc<dyn FeedbackStore>) -> Arc<State> {
        Arc::new(State {
            config: Config {
                port: 0,
                redis_url: String::new(),
            },
            store,
        })
    }

    async fn call(state: Arc<State>, body: &str) -> (StatusCode, Value) {
        let response = feedback_handler(
            extract::State(state),
            Bytes::copy_from_slice(body.as_bytes()),
        )
        .await
        .into_response();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_full_submission() {
        let store = Arc::new(SpyStore::default());
        let (status, json) = call(
            test_state(store.clone()),
            r#"{"name": "Ann", "email": "ann@example.com", "message": "Great service!"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Feedback received!");
        assert_eq!(json["data"]["name"], "Ann");
        assert_eq!(json["data"]["email"], "ann@example.com");
        assert_eq!(json["data"]["message"], "Great service!");
        assert!(json["data"]["feedbackId"].is_string());
        assert!(json["data"]["createdAt"].is_string());
        assert_eq!(store.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_object() {
        let store = Arc::new(SpyStore::default());
        let (status, json) = call(test_state(store), "{}").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["name"].is_null());
        assert!(json["data"]["feedbackId"].is_string());
    }

    #[tokio::test]
    async fn test_success_content_type() {
        let response = feedback_handler(
            extract::State(test_state(Arc::new(SpyStore::default()))),
            Bytes::from_static(b"{}"),
        )
        .await
        .into_response();

        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_malformed_body_skips_store() {
        let store = Arc::new(SpyStore::default());
        let (status, json) = call(test_state(store.clone()), "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Malformed payload");
        assert_eq!(store.records.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let (status, json) = call(test_state(Arc::new(FailingStore)), "{}").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Storage write failed");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_identical_submissions_get_distinct_ids() {
        let store = Arc::new(SpyStore::default());
        let state = test_state(store.clone());

        let (_, first) = call(state.clone(), r#"{"message": "same"}"#).await;
        let (_, second) = call(state, r#"{"message": "same"}"#).await;

        assert_ne!(first["data"]["feedbackId"], second["data"]["feedbackId"]);
        assert_eq!(store.records.lock().unwrap().len(), 2);
    }
}
