use teloxide::prelude::*;
use crate::conversation::{ConversationEngine, InboundEvent};
use super::delivery::{deliver, Origin};
use super::message::sender_from_user;
use super::HandlerResult;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    engine: ConversationEngine,
) -> HandlerResult {
    let sender = sender_from_user(&q.from);
    let data = q.data.clone().unwrap_or_default();

    let origin = Origin {
        sender_id: sender.id,
        callback_id: Some(q.id.clone()),
        message: q.message.as_ref().map(|m| (m.chat.id, m.id)),
    };

    let effects = engine.handle(InboundEvent::callback(sender, data)).await;
    deliver(&bot, &effects, &origin).await;

    Ok(())
}
