use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::connection::DatabaseManager;
use super::error::{StoreError, StoreResult};
use super::models::*;
use crate::conversation::FlowState;
use crate::utils::logging::log_database_operation;

/// Aggregate counts reported by `/stats` and the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: i64,
    pub total_questions: i64,
    pub pending_questions: i64,
}

/// Durable home of users, questions, answers and conversation states.
///
/// The engine keeps no copies of these rows; every handler reads the store
/// fresh, so a restart resumes any conversation from its last saved step.
#[derive(Clone)]
pub struct Store {
    db: DatabaseManager,
}

impl Store {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub async fn upsert_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> StoreResult<()> {
        User::upsert(self.pool(), user_id, username, first_name, last_name).await?;
        Ok(())
    }

    pub async fn user(&self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(self.pool(), user_id).await?)
    }

    pub async fn create_question(&self, user_id: i64, text: &str) -> StoreResult<i64> {
        let question_id = Question::create(self.pool(), user_id, text).await?;
        log_database_operation("INSERT", "questions", Some(&format!("#{question_id} by {user_id}")));
        Ok(question_id)
    }

    /// Saves the question text and moves the user to `confirm_question` in
    /// one transaction.
    ///
    /// When `draft` names a question the user staged earlier and it is still
    /// pending, its text is rewritten instead of appending a new row.
    pub async fn stage_question(
        &self,
        user_id: i64,
        text: &str,
        draft: Option<i64>,
    ) -> StoreResult<i64> {
        let mut tx = self.pool().begin().await?;

        let revised = match draft {
            Some(id) => Question::revise(&mut tx, id, user_id, text).await?.then_some(id),
            None => None,
        };
        let question_id = match revised {
            Some(id) => id,
            None => Question::create(&mut tx, user_id, text).await?,
        };

        let state = FlowState::ConfirmQuestion {
            question_id,
            question_text: text.to_string(),
        };
        UserStateRow::save(&mut tx, user_id, state.tag(), &state.payload()?).await?;

        tx.commit().await?;
        log_database_operation("STAGE", "questions", Some(&format!("#{question_id} by {user_id}")));
        Ok(question_id)
    }

    pub async fn find_question(&self, question_id: i64) -> StoreResult<Option<Question>> {
        Ok(Question::find_by_id(self.pool(), question_id).await?)
    }

    pub async fn pending_questions(&self, limit: i64) -> StoreResult<Vec<Question>> {
        Ok(Question::find_pending(self.pool(), limit).await?)
    }

    /// Inserts the answer and flips the question to answered as one unit.
    ///
    /// Either both writes are committed or neither is visible. Fails with
    /// [`StoreError::QuestionNotPending`] if the question is missing or
    /// already answered.
    pub async fn record_answer(
        &self,
        question_id: i64,
        responder_id: i64,
        text: &str,
    ) -> StoreResult<i64> {
        self.write_answer(question_id, responder_id, text, false).await
    }

    /// [`record_answer`](Self::record_answer) that also clears the
    /// responder's conversation state inside the same transaction.
    pub async fn finish_answer(
        &self,
        question_id: i64,
        responder_id: i64,
        text: &str,
    ) -> StoreResult<i64> {
        self.write_answer(question_id, responder_id, text, true).await
    }

    async fn write_answer(
        &self,
        question_id: i64,
        responder_id: i64,
        text: &str,
        clear_responder_state: bool,
    ) -> StoreResult<i64> {
        let mut tx = self.pool().begin().await?;

        let pending = Question::find_by_id(&mut tx, question_id)
            .await?
            .map(|q| q.is_pending())
            .unwrap_or(false);
        if !pending {
            tx.rollback().await?;
            return Err(StoreError::QuestionNotPending(question_id));
        }

        let now = Utc::now().to_rfc3339();
        let answer_id = Answer::insert(&mut tx, question_id, responder_id, text, &now).await?;
        if !Question::mark_answered(&mut tx, question_id, &now).await? {
            tx.rollback().await?;
            return Err(StoreError::QuestionNotPending(question_id));
        }
        if clear_responder_state {
            UserStateRow::delete(&mut tx, responder_id).await?;
        }

        tx.commit().await?;
        log_database_operation("ANSWER", "answers", Some(&format!("#{question_id} by {responder_id}")));
        Ok(answer_id)
    }

    pub async fn answer_for(&self, question_id: i64) -> StoreResult<Option<Answer>> {
        Ok(Answer::find_by_question(self.pool(), question_id).await?)
    }

    /// `None` means the user has no active flow.
    pub async fn get_state(&self, user_id: i64) -> StoreResult<Option<FlowState>> {
        let Some(row) = UserStateRow::find(self.pool(), user_id).await? else {
            return Ok(None);
        };

        if !FlowState::is_known_tag(&row.state) {
            return Err(StoreError::CorruptState {
                user_id,
                tag: row.state,
            });
        }

        Ok(Some(FlowState::from_parts(&row.state, row.data.as_deref())?))
    }

    pub async fn set_state(&self, user_id: i64, state: &FlowState) -> StoreResult<()> {
        let payload = state.payload()?;
        UserStateRow::save(self.pool(), user_id, state.tag(), &payload).await?;
        log_database_operation("SET_STATE", "user_states", Some(&format!("{user_id} -> {}", state.tag())));
        Ok(())
    }

    /// Moves the user to `next`, or to idle when `None`, and deletes any
    /// question they staged but never confirmed. Both happen in one
    /// transaction.
    ///
    /// An unreadable stored state is simply overwritten, so `/start` always
    /// recovers the user.
    pub async fn replace_flow(&self, user_id: i64, next: Option<&FlowState>) -> StoreResult<()> {
        let mut tx = self.pool().begin().await?;

        let staged = UserStateRow::find(&mut tx, user_id)
            .await?
            .and_then(|row| FlowState::from_parts(&row.state, row.data.as_deref()).ok())
            .and_then(|state| match state {
                FlowState::AwaitingQuestion { draft_question_id } => draft_question_id,
                FlowState::ConfirmQuestion { question_id, .. } => Some(question_id),
                _ => None,
            });
        if let Some(question_id) = staged {
            if Question::discard_draft(&mut tx, question_id, user_id).await? {
                log_database_operation("DISCARD_DRAFT", "questions", Some(&format!("#{question_id} by {user_id}")));
            }
        }

        match next {
            Some(state) => UserStateRow::save(&mut tx, user_id, state.tag(), &state.payload()?).await?,
            None => UserStateRow::delete(&mut tx, user_id).await?,
        }

        tx.commit().await?;
        log_database_operation(
            "REPLACE_FLOW",
            "user_states",
            Some(&format!("{user_id} -> {}", next.map(FlowState::tag).unwrap_or("idle"))),
        );
        Ok(())
    }

    pub async fn clear_state(&self, user_id: i64) -> StoreResult<()> {
        UserStateRow::delete(self.pool(), user_id).await?;
        log_database_operation("CLEAR_STATE", "user_states", Some(&user_id.to_string()));
        Ok(())
    }

    pub async fn stats(&self) -> StoreResult<Stats> {
        Ok(Stats {
            total_users: User::count(self.pool()).await?,
            total_questions: Question::count(self.pool()).await?,
            pending_questions: Question::count_pending(self.pool()).await?,
        })
    }
}
