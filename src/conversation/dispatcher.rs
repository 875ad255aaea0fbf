use teloxide::utils::command::BotCommands;

use super::effect::{Effect, Keyboard, OutboundMessage, TextFormat};
use super::event::{Action, InboundEvent, Input, MenuItem, Sender};
use super::state::FlowState;
use super::texts;
use crate::bot::commands::Command;
use crate::database::{Store, StoreResult};
use crate::utils::logging::{log_event, log_handler_error, log_rejected_action};

/// Number of questions listed by `/pending`.
const PENDING_LIST_LIMIT: i64 = 10;

/// Routes inbound events to exactly one handler.
///
/// Priority: bot command, then menu button text, then free text for an
/// `awaiting_*` state, then the fallback menu. Handlers never fail outward:
/// a store error becomes a generic "try again" reply and leaves the stored
/// state as it was.
#[derive(Clone)]
pub struct ConversationEngine {
    pub(super) store: Store,
    pub(super) admin_id: i64,
}

impl ConversationEngine {
    pub fn new(store: Store, admin_id: i64) -> Self {
        Self { store, admin_id }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn admin_id(&self) -> i64 {
        self.admin_id
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_id
    }

    /// Processes one event and returns the effects to deliver, in order.
    pub async fn handle(&self, event: InboundEvent) -> Vec<Effect> {
        let sender = &event.sender;
        let details = match &event.input {
            Input::Command(command) => Some(format!("{command:?}")),
            Input::Callback(data) => Some(data.clone()),
            Input::Text(_) | Input::Unsupported => None,
        };
        log_event(event.kind(), &sender.handle(), sender.id, details.as_deref());

        match self.route(&event).await {
            Ok(effects) => effects,
            Err(e) => {
                log_handler_error(event.kind(), sender.id, &e.to_string());
                match event.input {
                    Input::Callback(_) => vec![Effect::Notify(texts::generic_error())],
                    _ => vec![Effect::Send(OutboundMessage::new(sender.id, texts::generic_error()))],
                }
            }
        }
    }

    async fn route(&self, event: &InboundEvent) -> StoreResult<Vec<Effect>> {
        let sender = &event.sender;
        self.store
            .upsert_user(
                sender.id,
                sender.username.as_deref(),
                sender.first_name.as_deref(),
                sender.last_name.as_deref(),
            )
            .await?;

        match &event.input {
            Input::Command(command) => self.on_command(sender, command).await,
            Input::Callback(data) => match Action::parse(data) {
                Some(action) => self.on_action(sender, action).await,
                None => {
                    log_rejected_action(data, sender.id, "unrecognized callback data");
                    Ok(vec![Effect::Notify(texts::question_not_found())])
                }
            },
            Input::Text(text) => {
                if let Some(item) = MenuItem::from_text(text) {
                    return self.on_menu(sender, item).await;
                }
                match self.store.get_state(sender.id).await? {
                    Some(FlowState::AwaitingQuestion { draft_question_id }) => {
                        self.submit_question(sender, text, draft_question_id).await
                    }
                    Some(FlowState::AwaitingResponse {
                        question_id,
                        target_user_id,
                        question_text,
                    }) => {
                        self.submit_response(sender, question_id, target_user_id, question_text, text)
                            .await
                    }
                    _ => Ok(self.unrecognized(sender)),
                }
            }
            Input::Unsupported => match self.store.get_state(sender.id).await? {
                Some(FlowState::AwaitingQuestion { .. }) | Some(FlowState::AwaitingResponse { .. }) => {
                    Ok(reply(sender, texts::invalid_text("Only text messages are supported")))
                }
                _ => Ok(self.unrecognized(sender)),
            },
        }
    }

    async fn on_command(&self, sender: &Sender, command: &Command) -> StoreResult<Vec<Effect>> {
        match command {
            Command::Start => self.restart(sender, texts::welcome(sender)).await,
            Command::Cancel => self.restart(sender, texts::cancelled()).await,
            Command::Help => Ok(reply(sender, Command::descriptions().to_string())),
            Command::Ask => self.compose(sender).await,
            Command::Stats => {
                if !self.is_admin(sender.id) {
                    return Ok(reply(sender, texts::admin_only()));
                }
                let stats = self.store.stats().await?;
                Ok(reply(sender, texts::stats(&stats)))
            }
            Command::Pending => {
                if !self.is_admin(sender.id) {
                    return Ok(reply(sender, texts::admin_only()));
                }
                self.list_pending(sender).await
            }
        }
    }

    async fn on_menu(&self, sender: &Sender, item: MenuItem) -> StoreResult<Vec<Effect>> {
        match item {
            MenuItem::NewMessage => self.compose(sender).await,
            MenuItem::Faq => Ok(vec![Effect::Send(
                OutboundMessage::new(sender.id, texts::FAQ).html(),
            )]),
            MenuItem::About => Ok(vec![Effect::Send(
                OutboundMessage::new(sender.id, texts::ABOUT).html(),
            )]),
        }
    }

    async fn on_action(&self, sender: &Sender, action: Action) -> StoreResult<Vec<Effect>> {
        match action {
            Action::ConfirmQuestion(id) => self.confirm_question(sender, id).await,
            Action::EditQuestion(id) => self.edit_question(sender, id).await,
            Action::AnswerQuestion(id) => self.answer_question(sender, id).await,
            Action::SendResponse(id) => self.send_response(sender, id).await,
            Action::EditResponse(id) => self.edit_response(sender, id).await,
        }
    }

    async fn list_pending(&self, sender: &Sender) -> StoreResult<Vec<Effect>> {
        let questions = self.store.pending_questions(PENDING_LIST_LIMIT).await?;
        if questions.is_empty() {
            return Ok(reply(sender, texts::NO_PENDING));
        }

        Ok(questions
            .iter()
            .map(|question| {
                Effect::Send(OutboundMessage {
                    target: sender.id,
                    text: texts::pending_question(question),
                    format: TextFormat::MarkdownV2,
                    keyboard: Keyboard::Inline(texts::answer_buttons(question.id)),
                    on_failure: None,
                })
            })
            .collect())
    }

    /// Fallback for input no handler claims.
    pub(super) fn unrecognized(&self, sender: &Sender) -> Vec<Effect> {
        if self.is_admin(sender.id) {
            reply(sender, texts::ADMIN_HINT)
        } else {
            vec![Effect::Send(
                OutboundMessage::new(sender.id, texts::CHOOSE_ACTION).keyboard(Keyboard::MainMenu),
            )]
        }
    }
}

/// A single plain-text reply to the sender.
pub(super) fn reply(sender: &Sender, text: impl Into<String>) -> Vec<Effect> {
    vec![Effect::Send(OutboundMessage::new(sender.id, text))]
}
