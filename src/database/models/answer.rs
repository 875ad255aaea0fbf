use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub admin_id: i64,
    pub answer_text: String,
    pub created_at: String,
}

impl Answer {
    /// Inserts the answer row only. Use [`Store::record_answer`](crate::database::Store::record_answer)
    /// to also flip the question status in the same transaction.
    pub async fn insert<'e, E>(
        executor: E,
        question_id: i64,
        admin_id: i64,
        answer_text: &str,
        created_at: &str,
    ) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO answers (question_id, admin_id, answer_text, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(question_id)
        .bind(admin_id)
        .bind(answer_text)
        .bind(created_at)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_question(
        pool: &sqlx::SqlitePool,
        question_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, admin_id, answer_text, created_at FROM answers WHERE question_id = ?",
        )
        .bind(question_id)
        .fetch_optional(pool)
        .await
    }
}
