/// Emoji-prefixed feedback notices
pub mod feedback;
/// Escaping and trimming text for Telegram parse modes
pub mod format;
/// Consistent-format log lines
pub mod logging;
/// Input validation for user-supplied text and configuration
pub mod validation;
