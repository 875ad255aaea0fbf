use anyhow::{anyhow, Result};

/// Longest question or answer accepted. Leaves headroom under Telegram's
/// 4096-character message limit for the surrounding template.
pub const MAX_MESSAGE_CHARS: usize = 3500;

/// Validates question or answer text, returning it trimmed.
pub fn validate_message_text(text: &str) -> Result<&str> {
    let text = text.trim();

    if text.is_empty() {
        return Err(anyhow!("Message cannot be empty"));
    }

    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(anyhow!(
            "Message cannot be longer than {} characters",
            MAX_MESSAGE_CHARS
        ));
    }

    Ok(text)
}

/// Validates a Telegram user id used as the administrator identity.
pub fn validate_user_id(user_id: i64) -> Result<()> {
    // Private chat ids equal user ids, which are always positive
    if user_id <= 0 {
        return Err(anyhow!("User ID must be a positive number"));
    }

    // Telegram user ids fit in 52 bits
    if user_id > (1i64 << 52) {
        return Err(anyhow!("User ID out of valid range"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message_text_valid() {
        assert_eq!(validate_message_text("How do I add an achievement?").ok(), Some("How do I add an achievement?"));
        assert_eq!(validate_message_text("  padded  ").ok(), Some("padded"));
        assert!(validate_message_text("Как добавить достижение?").is_ok());
    }

    #[test]
    fn test_validate_message_text_empty() {
        assert!(validate_message_text("").is_err());
        assert!(validate_message_text("   \n\t").is_err());
    }

    #[test]
    fn test_validate_message_text_length_limit() {
        let at_limit = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message_text(&at_limit).is_ok());

        let too_long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let err = validate_message_text(&too_long).unwrap_err().to_string();
        assert!(err.contains("cannot be longer"));

        // Multi-byte characters are counted as characters, not bytes
        let cyrillic = "я".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message_text(&cyrillic).is_ok());
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id(5780499255).is_ok());
        assert!(validate_user_id(1).is_ok());
        assert!(validate_user_id(0).is_err());
        assert!(validate_user_id(-1001234567890).is_err());
        assert!(validate_user_id(i64::MAX).is_err());
    }
}
