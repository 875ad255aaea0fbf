use teloxide::prelude::*;
use crate::bot::commands::Command;
use crate::conversation::{ConversationEngine, InboundEvent, Input, Sender};
use super::delivery::{deliver, Origin};
use super::HandlerResult;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: ConversationEngine,
) -> HandlerResult {
    let Some(sender) = msg.from().map(sender_from_user) else {
        return Ok(());
    };

    let origin = Origin::message(sender.id);
    let effects = engine.handle(InboundEvent::command(sender, cmd)).await;
    deliver(&bot, &effects, &origin).await;

    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    engine: ConversationEngine,
) -> HandlerResult {
    let Some(sender) = msg.from().map(sender_from_user) else {
        return Ok(());
    };

    let input = match msg.text() {
        Some(text) => Input::Text(text.to_string()),
        None => Input::Unsupported,
    };

    let origin = Origin::message(sender.id);
    let effects = engine.handle(InboundEvent { sender, input }).await;
    deliver(&bot, &effects, &origin).await;

    Ok(())
}

/// Identity and display name of a Telegram user.
pub fn sender_from_user(user: &teloxide::types::User) -> Sender {
    Sender {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
        last_name: user.last_name.clone(),
    }
}
