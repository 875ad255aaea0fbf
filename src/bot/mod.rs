/// Bot command definitions
pub mod commands;
/// Telegram update handlers and effect delivery
pub mod handlers;
