use thiserror::Error;

/// Failures surfaced by [`Store`](super::Store) operations.
///
/// Any variant means the requested mutation did not happen; callers must not
/// assume the side effect took place.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid state payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Unknown conversation state '{tag}' stored for user {user_id}")]
    CorruptState { user_id: i64, tag: String },
    #[error("Question #{0} does not exist or is already answered")]
    QuestionNotPending(i64),
}

pub type StoreResult<T> = Result<T, StoreError>;
