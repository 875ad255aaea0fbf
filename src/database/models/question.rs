use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ANSWERED: &str = "answered";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub user_id: i64,
    pub question_text: String,
    pub status: String, // 'pending', 'answered'
    pub created_at: String,
    pub answered_at: Option<String>,
}

impl Question {
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }

    /// Appends a pending question and returns its id.
    pub async fn create<'e, E>(
        executor: E,
        user_id: i64,
        question_text: &str,
    ) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO questions (user_id, question_text, status, created_at)
            VALUES (?, ?, 'pending', ?)
            "#,
        )
        .bind(user_id)
        .bind(question_text)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replaces the text of a question that is still pending and owned by
    /// `user_id`. Returns false when no such question exists.
    pub async fn revise<'e, E>(
        executor: E,
        question_id: i64,
        user_id: i64,
        question_text: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE questions SET question_text = ? WHERE id = ? AND user_id = ? AND status = 'pending'",
        )
        .bind(question_text)
        .bind(question_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Flips a pending question to answered. Returns false if it was not pending.
    pub async fn mark_answered<'e, E>(
        executor: E,
        question_id: i64,
        answered_at: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE questions SET status = 'answered', answered_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(answered_at)
        .bind(question_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find_by_id<'e, E>(
        executor: E,
        question_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Question>(
            "SELECT id, user_id, question_text, status, created_at, answered_at FROM questions WHERE id = ?",
        )
        .bind(question_id)
        .fetch_optional(executor)
        .await
    }

    /// Oldest submitted, unanswered questions first. Questions still staged
    /// in their author's conversation state are left out.
    pub async fn find_pending(
        pool: &sqlx::SqlitePool,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, user_id, question_text, status, created_at, answered_at
            FROM questions
            WHERE status = 'pending'
              AND NOT EXISTS (
                  SELECT 1 FROM user_states s
                  WHERE s.user_id = questions.user_id
                    AND s.state IN ('awaiting_question', 'waiting_for_question', 'confirm_question')
                    AND CASE WHEN json_valid(s.data)
                        THEN COALESCE(json_extract(s.data, '$.question_id'), json_extract(s.data, '$.draft_question_id'))
                    END = questions.id
              )
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Deletes a question its author staged but never confirmed. Submitted or
    /// answered questions are left alone. Returns whether a row was removed.
    pub async fn discard_draft<'e, E>(
        executor: E,
        question_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM questions
            WHERE id = ? AND user_id = ? AND status = 'pending'
              AND NOT EXISTS (SELECT 1 FROM answers WHERE question_id = questions.id)
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(pool)
            .await
    }

    /// Counts what [`find_pending`](Self::find_pending) would list.
    pub async fn count_pending(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM questions
            WHERE status = 'pending'
              AND NOT EXISTS (
                  SELECT 1 FROM user_states s
                  WHERE s.user_id = questions.user_id
                    AND s.state IN ('awaiting_question', 'waiting_for_question', 'confirm_question')
                    AND CASE WHEN json_valid(s.data)
                        THEN COALESCE(json_extract(s.data, '$.question_id'), json_extract(s.data, '$.draft_question_id'))
                    END = questions.id
              )
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
