use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::FeedbackRequest;
use crate::errors::RequestError;
use crate::models::{Feedback, MAX_FEEDBACK_CHARS};

const FEEDBACK_COLUMNS: &str = "id, user_id, subject, message, rating, created_at";

pub async fn insert_feedback_in_db(
    pool: &SqlitePool,
    user_id: i64,
    FeedbackRequest {
        subject,
        message,
        rating,
    }: FeedbackRequest,
) -> Result<Feedback, RequestError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(RequestError::RunTimeError("Feedback must not be empty"));
    }
    if message.chars().count() > MAX_FEEDBACK_CHARS {
        return Err(RequestError::RunTimeError("Feedback is too long"));
    }
    if let Some(rating) = rating {
        if !(1..=5).contains(&rating) {
            return Err(RequestError::RunTimeError(
                "Rating must be between 1 and 5",
            ));
        }
    }

    let query = format!(
        "INSERT INTO feedback (user_id, subject, message, rating) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {FEEDBACK_COLUMNS}"
    );
    let feedback = sqlx::query_as::<Sqlite, Feedback>(&query)
        .bind(user_id)
        .bind(subject)
        .bind(message)
        .bind(rating)
        .fetch_one(pool)
        .await?;
    Ok(feedback)
}

pub async fn list_feedback_in_db(pool: &SqlitePool) -> Result<Vec<Feedback>, RequestError> {
    let query = format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY created_at DESC, id DESC"
    );
    let feedback = sqlx::query_as::<Sqlite, Feedback>(&query)
        .fetch_all(pool)
        .await?;
    Ok(feedback)
}
