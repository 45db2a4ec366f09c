//! # Feedback
//!
//! Assembly and submission of feedback records.
//!
//! ## Record
//!
//! - `feedbackId`: UUID v4, assigned here exactly once, the storage key
//! - `createdAt`: server-side UTC instant, RFC 3339 with microseconds
//! - `name`/`email`/`message`: caller-supplied, all optional
//!
//! ## Permissiveness
//!
//! - Missing fields are stored as null, not rejected
//! - Unknown fields are ignored
//! - No dedup, resubmitting the same body creates a second record
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{database::FeedbackStore, error::AppError};

/// Caller-supplied fields of a submission. Anything else in the body is
/// dropped on the floor.
#[derive(Deserialize)]
pub struct Submission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// The persisted record, serialized with the same camelCase field names on
/// the wire and in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub created_at: String,
}

pub fn parse_submission(body: &[u8]) -> Result<Submission, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::MalformedPayload)
}

pub fn build_feedback(submission: Submission) -> Feedback {
    Feedback {
        feedback_id: Uuid::new_v4().to_string(),
        name: submission.name,
        email: submission.email,
        message: submission.message,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

pub async fn submit(
    store: &dyn FeedbackStore,
    submission: Submission,
) -> Result<Feedback, AppError> {
    let record = build_feedback(submission);
    store.put(&record).await?;

    Ok(record)
}
