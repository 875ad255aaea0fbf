//! Transition handlers for the question and answer flows.
//!
//! Every handler commits its store mutation before returning effects. A
//! button whose embedded question id does not match the stored payload is
//! rejected as stale; it never falls back to another question.

use super::dispatcher::{reply, ConversationEngine};
use super::effect::{Effect, Keyboard, OutboundMessage};
use super::event::{Action, Sender};
use super::state::FlowState;
use super::texts;
use crate::database::{StoreError, StoreResult};
use crate::utils::logging::{log_rejected_action, log_transition};
use crate::utils::validation::validate_message_text;

impl ConversationEngine {
    /// `/start` and `/cancel`: drop any active flow, including an unsent
    /// draft, and show the menu.
    pub(super) async fn restart(&self, sender: &Sender, text: String) -> StoreResult<Vec<Effect>> {
        self.store.replace_flow(sender.id, None).await?;
        log_transition(sender.id, None);

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, text).keyboard(Keyboard::MainMenu),
        )])
    }

    /// idle -> awaiting_question. Overwrites any flow in progress and drops
    /// an unsent draft.
    pub(super) async fn compose(&self, sender: &Sender) -> StoreResult<Vec<Effect>> {
        let state = FlowState::AwaitingQuestion { draft_question_id: None };
        self.store.replace_flow(sender.id, Some(&state)).await?;
        log_transition(sender.id, Some(state.tag()));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, texts::PROMPT_QUESTION).keyboard(Keyboard::Remove),
        )])
    }

    /// awaiting_question + text -> confirm_question.
    pub(super) async fn submit_question(
        &self,
        sender: &Sender,
        text: &str,
        draft_question_id: Option<i64>,
    ) -> StoreResult<Vec<Effect>> {
        let question_text = match validate_message_text(text) {
            Ok(valid) => valid,
            Err(e) => return Ok(reply(sender, texts::invalid_text(&e.to_string()))),
        };

        let question_id = self
            .store
            .stage_question(sender.id, question_text, draft_question_id)
            .await?;
        log_transition(sender.id, Some(FlowState::CONFIRM_QUESTION));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, texts::confirm_question(question_text))
                .markdown()
                .keyboard(Keyboard::Inline(texts::confirm_question_buttons(question_id))),
        )])
    }

    /// confirm_question + confirm -> idle, question forwarded to the administrator.
    pub(super) async fn confirm_question(
        &self,
        sender: &Sender,
        question_id: i64,
    ) -> StoreResult<Vec<Effect>> {
        let question_text = match self.store.get_state(sender.id).await? {
            Some(FlowState::ConfirmQuestion { question_id: stored, question_text })
                if stored == question_id =>
            {
                question_text
            }
            _ => return Ok(stale(sender, Action::ConfirmQuestion(question_id))),
        };

        let pending = match self.store.find_question(question_id).await? {
            Some(question) => question.is_pending(),
            None => return Ok(stale(sender, Action::ConfirmQuestion(question_id))),
        };
        self.store.clear_state(sender.id).await?;
        log_transition(sender.id, None);

        if !pending {
            log_rejected_action(Action::ConfirmQuestion(question_id).tag(), sender.id, "already answered");
            return Ok(vec![
                Effect::Notify(texts::already_answered()),
                Effect::EditOrigin(texts::already_answered()),
            ]);
        }

        Ok(vec![
            Effect::Send(
                OutboundMessage::new(
                    self.admin_id,
                    texts::admin_forward(sender, question_id, &question_text),
                )
                .markdown()
                .keyboard(Keyboard::Inline(texts::answer_buttons(question_id)))
                .on_failure(texts::question_delivery_failed()),
            ),
            Effect::Notify(texts::question_sent_notice()),
            Effect::EditOrigin(texts::QUESTION_SENT.to_string()),
            Effect::Send(
                OutboundMessage::new(sender.id, texts::ANYTHING_ELSE).keyboard(Keyboard::MainMenu),
            ),
        ])
    }

    /// confirm_question + edit -> awaiting_question, keeping the draft id so
    /// the next text rewrites the same question.
    pub(super) async fn edit_question(
        &self,
        sender: &Sender,
        question_id: i64,
    ) -> StoreResult<Vec<Effect>> {
        match self.store.get_state(sender.id).await? {
            Some(FlowState::ConfirmQuestion { question_id: stored, .. }) if stored == question_id => {}
            _ => return Ok(stale(sender, Action::EditQuestion(question_id))),
        }

        let state = FlowState::AwaitingQuestion { draft_question_id: Some(question_id) };
        self.store.set_state(sender.id, &state).await?;
        log_transition(sender.id, Some(state.tag()));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, texts::PROMPT_QUESTION).keyboard(Keyboard::Remove),
        )])
    }

    /// Administrator presses "answer" -> awaiting_response.
    ///
    /// Shares the administrator's single state slot with the question flow, so
    /// a question being composed by the administrator is dropped along with
    /// its unsent draft.
    pub(super) async fn answer_question(
        &self,
        sender: &Sender,
        question_id: i64,
    ) -> StoreResult<Vec<Effect>> {
        if !self.is_admin(sender.id) {
            log_rejected_action(Action::AnswerQuestion(question_id).tag(), sender.id, "not the administrator");
            return Ok(vec![Effect::Notify(texts::admin_only())]);
        }

        let question = match self.store.find_question(question_id).await? {
            Some(question) => question,
            None => return Ok(stale(sender, Action::AnswerQuestion(question_id))),
        };
        if !question.is_pending() {
            log_rejected_action(Action::AnswerQuestion(question_id).tag(), sender.id, "already answered");
            return Ok(vec![Effect::Notify(texts::already_answered())]);
        }

        let prompt = texts::prompt_response(&question.question_text);
        let state = FlowState::AwaitingResponse {
            question_id,
            target_user_id: question.user_id,
            question_text: question.question_text,
        };
        self.store.replace_flow(sender.id, Some(&state)).await?;
        log_transition(sender.id, Some(state.tag()));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, prompt).keyboard(Keyboard::ForceReply),
        )])
    }

    /// awaiting_response + text -> confirm_response.
    pub(super) async fn submit_response(
        &self,
        sender: &Sender,
        question_id: i64,
        target_user_id: i64,
        question_text: String,
        text: &str,
    ) -> StoreResult<Vec<Effect>> {
        let response_text = match validate_message_text(text) {
            Ok(valid) => valid.to_string(),
            Err(e) => return Ok(reply(sender, texts::invalid_text(&e.to_string()))),
        };

        let preview = texts::confirm_response(&response_text);
        let state = FlowState::ConfirmResponse {
            question_id,
            target_user_id,
            question_text,
            response_text,
        };
        self.store.set_state(sender.id, &state).await?;
        log_transition(sender.id, Some(state.tag()));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, preview)
                .markdown()
                .keyboard(Keyboard::Inline(texts::confirm_response_buttons(question_id))),
        )])
    }

    /// confirm_response + send -> idle; the answer is recorded, then delivered.
    pub(super) async fn send_response(
        &self,
        sender: &Sender,
        question_id: i64,
    ) -> StoreResult<Vec<Effect>> {
        let (target_user_id, question_text, response_text) =
            match self.store.get_state(sender.id).await? {
                Some(FlowState::ConfirmResponse {
                    question_id: stored,
                    target_user_id,
                    question_text,
                    response_text,
                }) if stored == question_id => (target_user_id, question_text, response_text),
                _ => return Ok(stale(sender, Action::SendResponse(question_id))),
            };

        match self
            .store
            .finish_answer(question_id, sender.id, &response_text)
            .await
        {
            Ok(_) => {}
            Err(StoreError::QuestionNotPending(_)) => {
                // Answered from another flow meanwhile; this draft is dead.
                self.store.clear_state(sender.id).await?;
                log_rejected_action(Action::SendResponse(question_id).tag(), sender.id, "already answered");
                return Ok(vec![
                    Effect::Notify(texts::already_answered()),
                    Effect::EditOrigin(texts::already_answered()),
                ]);
            }
            Err(e) => return Err(e),
        }
        log_transition(sender.id, None);

        Ok(vec![
            Effect::Send(
                OutboundMessage::new(
                    target_user_id,
                    texts::user_answer(&question_text, &response_text),
                )
                .html()
                .on_failure(texts::answer_delivery_failed()),
            ),
            Effect::Notify(texts::answer_sent_notice()),
            Effect::EditOrigin(texts::answer_sent(target_user_id)),
        ])
    }

    /// confirm_response + edit -> awaiting_response.
    pub(super) async fn edit_response(
        &self,
        sender: &Sender,
        question_id: i64,
    ) -> StoreResult<Vec<Effect>> {
        let (target_user_id, question_text) = match self.store.get_state(sender.id).await? {
            Some(FlowState::ConfirmResponse {
                question_id: stored,
                target_user_id,
                question_text,
                ..
            }) if stored == question_id => (target_user_id, question_text),
            _ => return Ok(stale(sender, Action::EditResponse(question_id))),
        };

        let prompt = texts::prompt_response(&question_text);
        let state = FlowState::AwaitingResponse {
            question_id,
            target_user_id,
            question_text,
        };
        self.store.set_state(sender.id, &state).await?;
        log_transition(sender.id, Some(state.tag()));

        Ok(vec![Effect::Send(
            OutboundMessage::new(sender.id, prompt).keyboard(Keyboard::ForceReply),
        )])
    }
}

/// Terminal "not found" for a button that no longer matches the stored state.
fn stale(sender: &Sender, action: Action) -> Vec<Effect> {
    log_rejected_action(&action.callback_data(), sender.id, "no matching conversation state");
    let notice = match action {
        Action::SendResponse(_) | Action::EditResponse(_) => texts::answer_not_found(),
        _ => texts::question_not_found(),
    };
    vec![Effect::Notify(notice)]
}
