mod common;

use common::setup_test_engine;
use support_bot::bot::handlers::message::sender_from_user;
use support_bot::bot::handlers::BotHandler;
use teloxide::types::User;

#[tokio::test]
async fn test_schema_builds() -> anyhow::Result<()> {
    let (engine, _temp_dir) = setup_test_engine().await?;
    let handler = BotHandler::new(engine);

    let _schema = handler.schema();

    Ok(())
}

#[test]
fn test_sender_from_telegram_user() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 42,
        "is_bot": false,
        "first_name": "Kate",
        "last_name": "Smith",
        "username": "kate"
    }))
    .unwrap();

    let sender = sender_from_user(&user);
    assert_eq!(sender.id, 42);
    assert_eq!(sender.username.as_deref(), Some("kate"));
    assert_eq!(sender.first_name.as_deref(), Some("Kate"));
    assert_eq!(sender.last_name.as_deref(), Some("Smith"));
}

#[test]
fn test_sender_without_username_uses_first_name() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 7,
        "is_bot": false,
        "first_name": "Ivan"
    }))
    .unwrap();

    let sender = sender_from_user(&user);
    assert_eq!(sender.handle(), "Ivan");
    assert_eq!(sender.last_name, None);
}
