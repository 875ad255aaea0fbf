use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};

/// Raw `user_states` row: a state tag plus its JSON payload.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserStateRow {
    pub user_id: i64,
    pub state: String,
    pub data: Option<String>,
    pub updated_at: String,
}

impl UserStateRow {
    pub async fn find<'e, E>(executor: E, user_id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserStateRow>(
            "SELECT user_id, state, data, updated_at FROM user_states WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Overwrites whatever state the user had.
    pub async fn save<'e, E>(
        executor: E,
        user_id: i64,
        state: &str,
        data: &str,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_states (user_id, state, data, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                state = excluded.state,
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(state)
        .bind(data)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, user_id: i64) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("DELETE FROM user_states WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
