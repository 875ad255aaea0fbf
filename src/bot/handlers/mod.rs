pub mod callback;
pub mod delivery;
pub mod message;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    prelude::*,
};
use crate::bot::commands::Command;
use crate::conversation::ConversationEngine;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub engine: ConversationEngine,
}

impl BotHandler {
    pub fn new(engine: ConversationEngine) -> Self {
        Self { engine }
    }

    /// Commands first, then any other message, then inline button presses.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let engine_command = self.engine.clone();
        let engine_message = self.engine.clone();
        let engine_callback = self.engine.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let engine = engine_command.clone();
                        async move { message::command_handler(bot, msg, cmd, engine).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let engine = engine_message.clone();
                async move { message::message_handler(bot, msg, engine).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let engine = engine_callback.clone();
                async move { callback::callback_handler(bot, q, engine).await }
            }))
    }
}
