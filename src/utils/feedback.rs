/// Feedback types for short notices shown to the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }

    /// Prefixes `message` with this type's emoji.
    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.emoji(), message)
    }
}

pub fn success(message: &str) -> String {
    FeedbackType::Success.format(message)
}

pub fn warning(message: &str) -> String {
    FeedbackType::Warning.format(message)
}

pub fn error(message: &str) -> String {
    FeedbackType::Error.format(message)
}

pub fn info(message: &str) -> String {
    FeedbackType::Info.format(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
    }

    #[test]
    fn test_feedback_helpers() {
        assert_eq!(success("Sent"), "✅ Sent");
        assert_eq!(error("Question not found."), "❌ Question not found.");
        assert_eq!(warning("Careful"), "⚠️ Careful");
        assert_eq!(info("FYI"), "ℹ️ FYI");
    }
}
