//! Executes engine effects against the Telegram API.
//!
//! Sends are fire-and-forget: a failure is logged and, when the message
//! carries an `on_failure` notice, that notice replaces the confirmation the
//! sender would otherwise see. Stored state is never touched here.

use teloxide::prelude::*;
use teloxide::types::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, MessageId, ParseMode, ReplyMarkup,
};
use crate::conversation::{Effect, Keyboard, MenuItem, OutboundMessage, TextFormat};
use crate::utils::logging::log_delivery_error;

/// Where the triggering update came from.
#[derive(Debug, Clone)]
pub struct Origin {
    pub sender_id: i64,
    /// Set for inline button presses; every press must be answered once.
    pub callback_id: Option<String>,
    /// Message that carried the pressed button.
    pub message: Option<(ChatId, MessageId)>,
}

impl Origin {
    pub fn message(sender_id: i64) -> Self {
        Self {
            sender_id,
            callback_id: None,
            message: None,
        }
    }
}

pub async fn deliver(bot: &Bot, effects: &[Effect], origin: &Origin) {
    let mut failure_notice: Option<&str> = None;
    let mut callback_answered = false;

    for effect in effects {
        match effect {
            Effect::Send(message) => {
                if let Err(e) = send(bot, message).await {
                    log_delivery_error(message.target, &e.to_string());
                    if failure_notice.is_none() {
                        failure_notice = message.on_failure.as_deref();
                    }
                }
            }
            // A failed delivery overrides the confirmations that follow it.
            Effect::Notify(_) | Effect::EditOrigin(_) if failure_notice.is_some() => {}
            Effect::Notify(text) => {
                callback_answered |= notify(bot, origin, text, callback_answered).await;
            }
            Effect::EditOrigin(text) => {
                if let Some((chat_id, message_id)) = origin.message {
                    if let Err(e) = bot.edit_message_text(chat_id, message_id, text.clone()).await {
                        log_delivery_error(chat_id.0, &e.to_string());
                    }
                }
            }
        }
    }

    if let Some(notice) = failure_notice {
        callback_answered |= notify(bot, origin, notice, callback_answered).await;
    }

    if let (Some(callback_id), false) = (&origin.callback_id, callback_answered) {
        if let Err(e) = bot.answer_callback_query(callback_id.clone()).await {
            log_delivery_error(origin.sender_id, &e.to_string());
        }
    }
}

/// Answers the button press with `text`, or messages the sender when the
/// press was already answered or there is none. Returns whether the press
/// got answered.
async fn notify(bot: &Bot, origin: &Origin, text: &str, already_answered: bool) -> bool {
    match (&origin.callback_id, already_answered) {
        (Some(callback_id), false) => {
            if let Err(e) = bot
                .answer_callback_query(callback_id.clone())
                .text(text.to_string())
                .await
            {
                log_delivery_error(origin.sender_id, &e.to_string());
            }
            true
        }
        _ => {
            if let Err(e) = bot.send_message(ChatId(origin.sender_id), text.to_string()).await {
                log_delivery_error(origin.sender_id, &e.to_string());
            }
            false
        }
    }
}

async fn send(bot: &Bot, message: &OutboundMessage) -> ResponseResult<Message> {
    let mut request = bot.send_message(ChatId(message.target), message.text.clone());

    match message.format {
        TextFormat::Plain => {}
        TextFormat::MarkdownV2 => request = request.parse_mode(ParseMode::MarkdownV2),
        TextFormat::Html => request = request.parse_mode(ParseMode::Html),
    }

    if let Some(markup) = reply_markup(&message.keyboard) {
        request = request.reply_markup(markup);
    }

    request.await
}

/// Telegram markup for a keyboard; `None` leaves the client's keyboard alone.
pub fn reply_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::MainMenu => {
            let rows = MenuItem::ALL
                .iter()
                .map(|item| vec![KeyboardButton::new(item.label())])
                .collect::<Vec<_>>();
            Some(ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard(true)))
        }
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::ForceReply => Some(ReplyMarkup::ForceReply(ForceReply::new())),
        Keyboard::Inline(rows) => {
            let rows = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| {
                            InlineKeyboardButton::callback(
                                button.label.clone(),
                                button.action.callback_data(),
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{texts, Action, Button, ConversationEngine, InboundEvent, Sender};
    use crate::database::{DatabaseManager, Store};
    use axum::{body::Bytes, extract::{Path, State}, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const ADMIN_ID: i64 = 5780499255;

    /// Bot API calls seen by the local server: lowercased method name and JSON params.
    type Calls = Arc<Mutex<Vec<(String, Value)>>>;

    /// Answers callback queries and rejects every other method, the way the
    /// Bot API does for a chat that blocked the bot.
    async fn telegram_api(
        State(calls): State<Calls>,
        Path(path): Path<String>,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        let method = path.rsplit('/').next().unwrap_or_default().to_ascii_lowercase();
        let params = serde_json::from_slice(&body).unwrap_or(Value::Null);
        calls.lock().unwrap().push((method.clone(), params));

        if method == "answercallbackquery" {
            (StatusCode::OK, Json(json!({ "ok": true, "result": true })))
        } else {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "ok": false,
                    "error_code": 403,
                    "description": "Forbidden: bot was blocked by the user"
                })),
            )
        }
    }

    async fn spawn_telegram() -> (Bot, Calls) {
        let calls: Calls = Arc::default();
        let router = Router::new()
            .route("/*path", post(telegram_api))
            .with_state(calls.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let url = reqwest::Url::parse(&format!("http://{addr}/")).expect("api url");
        (Bot::new("t").set_api_url(url), calls)
    }

    fn called(calls: &Calls, method: &str) -> Vec<Value> {
        calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    fn button_press(sender_id: i64) -> Origin {
        Origin {
            sender_id,
            callback_id: Some("press-1".to_string()),
            message: Some((ChatId(sender_id), MessageId(7))),
        }
    }

    #[tokio::test]
    async fn test_failed_forward_replaces_confirmations() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite:{}", temp_dir.path().join("test.db").display());
        let db = DatabaseManager::new(&db_url).await.expect("database");
        db.run_migrations().await.expect("migrations");
        let engine = ConversationEngine::new(Store::new(db), ADMIN_ID);
        let kate = Sender::new(42).with_username("kate");

        engine.handle(InboundEvent::command(kate.clone(), crate::bot::commands::Command::Ask)).await;
        engine.handle(InboundEvent::text(kate.clone(), "Hi")).await;
        let question_id = engine
            .store()
            .get_state(42)
            .await
            .expect("state")
            .and_then(|state| state.question_id())
            .expect("question staged");
        let effects = engine
            .handle(InboundEvent::callback(kate, Action::ConfirmQuestion(question_id).callback_data()))
            .await;

        let (bot, calls) = spawn_telegram().await;
        deliver(&bot, &effects, &button_press(42)).await;

        let sent = called(&calls, "sendmessage");
        assert!(sent.iter().any(|params| params["chat_id"] == json!(ADMIN_ID)));

        let answers = called(&calls, "answercallbackquery");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0]["callback_query_id"], json!("press-1"));
        assert_eq!(answers[0]["text"], json!(texts::question_delivery_failed()));

        assert!(called(&calls, "editmessagetext").is_empty());

        // Delivery never resurrects the finished flow
        assert_eq!(engine.store().get_state(42).await.expect("state"), None);
    }

    #[tokio::test]
    async fn test_callback_answered_once_with_first_notice() {
        let (bot, calls) = spawn_telegram().await;
        let effects = vec![
            Effect::Notify("first".to_string()),
            Effect::Notify("second".to_string()),
        ];

        deliver(&bot, &effects, &button_press(42)).await;

        let answers = called(&calls, "answercallbackquery");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0]["text"], json!("first"));

        let sent = called(&calls, "sendmessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["chat_id"], json!(42));
        assert_eq!(sent[0]["text"], json!("second"));
    }

    #[tokio::test]
    async fn test_silent_press_is_still_answered() {
        let (bot, calls) = spawn_telegram().await;

        deliver(&bot, &[Effect::EditOrigin("done".to_string())], &button_press(42)).await;

        let edits = called(&calls, "editmessagetext");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0]["text"], json!("done"));

        let answers = called(&calls, "answercallbackquery");
        assert_eq!(answers.len(), 1);
        assert!(answers[0].get("text").map_or(true, Value::is_null));
    }

    #[tokio::test]
    async fn test_notice_without_button_is_a_message() {
        let (bot, calls) = spawn_telegram().await;

        deliver(&bot, &[Effect::Notify("hello".to_string())], &Origin::message(42)).await;

        assert!(called(&calls, "answercallbackquery").is_empty());
        let sent = called(&calls, "sendmessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["text"], json!("hello"));
    }

    #[test]
    fn test_no_keyboard_means_no_markup() {
        assert!(reply_markup(&Keyboard::None).is_none());
    }

    #[test]
    fn test_main_menu_has_one_item_per_row() {
        match reply_markup(&Keyboard::MainMenu) {
            Some(ReplyMarkup::Keyboard(markup)) => {
                assert_eq!(markup.keyboard.len(), MenuItem::ALL.len());
                assert_eq!(markup.keyboard[0][0].text, "📝 New message");
            }
            other => panic!("unexpected markup: {other:?}"),
        }
    }

    #[test]
    fn test_inline_buttons_carry_callback_data() {
        let keyboard = Keyboard::Inline(vec![vec![
            Button::new("✅ Yes, send", Action::ConfirmQuestion(1)),
            Button::new("✏️ Edit", Action::EditQuestion(1)),
        ]]);

        match reply_markup(&keyboard) {
            Some(ReplyMarkup::InlineKeyboard(markup)) => {
                assert_eq!(markup.inline_keyboard.len(), 1);
                assert_eq!(markup.inline_keyboard[0].len(), 2);
                assert_eq!(markup.inline_keyboard[0][0].text, "✅ Yes, send");
            }
            other => panic!("unexpected markup: {other:?}"),
        }
    }
}
