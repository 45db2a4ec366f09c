//! # Redis
//!
//! Durable key-value store for feedback records.
//!
//! ## Requirements
//!
//! - One put per submission, keyed by the generated id
//! - Write-only access, the service never reads records back
//! - Records are small, a few hundred bytes of JSON each
//!
//! ## Implementation
//!
//! - Key: `feedback:<feedbackId>`, value: the full record as a JSON string
//! - One `ConnectionManager` is created at startup and shared across
//!   handlers, clones are cheap handles onto the same multiplexed connection
//! - Persistence (AOF) is Redis configuration, not handled here
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::error;

use crate::{error::AppError, feedback::Feedback};

pub const FEEDBACK_KEY_PREFIX: &str = "feedback";

/// Single-record write seam over the underlying store.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn put(&self, record: &Feedback) -> Result<(), AppError>;
}

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl FeedbackStore for RedisStore {
    async fn put(&self, record: &Feedback) -> Result<(), AppError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| AppError::StorageFailure(Box::new(e)))?;
        let key = feedback_key(&record.feedback_id);

        let mut connection = self.connection.clone();
        connection.set::<_, _, ()>(&key, payload).await.map_err(|e| {
            error!("Redis write for {key} failed: {e}");
            AppError::StorageFailure(Box::new(e))
        })
    }
}

pub fn feedback_key(feedback_id: &str) -> String {
    format!("{FEEDBACK_KEY_PREFIX}:{feedback_id}")
}

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();

    client
        .get_connection_manager_with_config(config)
        .await
        .unwrap()
}
