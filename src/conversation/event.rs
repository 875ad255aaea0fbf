use crate::bot::commands::Command;

/// Who sent an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Sender {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: Option<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = last_name;
        self
    }

    /// `@username` when set, otherwise the first name, otherwise the id.
    pub fn handle(&self) -> String {
        match (&self.username, &self.first_name) {
            (Some(username), _) => format!("@{username}"),
            (None, Some(first_name)) => first_name.clone(),
            (None, None) => self.id.to_string(),
        }
    }

    /// Name used in greetings.
    pub fn greeting_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.first_name.clone())
            .unwrap_or_else(|| "there".to_string())
    }
}

/// What the sender did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A recognised bot command.
    Command(Command),
    /// Any text message, including menu button labels.
    Text(String),
    /// Raw data of a pressed inline button.
    Callback(String),
    /// A message without text (sticker, photo, ...).
    Unsupported,
}

/// One update from the transport, reduced to what the engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender: Sender,
    pub input: Input,
}

impl InboundEvent {
    pub fn command(sender: Sender, command: Command) -> Self {
        Self { sender, input: Input::Command(command) }
    }

    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self { sender, input: Input::Text(text.into()) }
    }

    pub fn callback(sender: Sender, data: impl Into<String>) -> Self {
        Self { sender, input: Input::Callback(data.into()) }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self.input {
            Input::Command(_) => "command",
            Input::Text(_) => "text",
            Input::Callback(_) => "callback",
            Input::Unsupported => "unsupported",
        }
    }
}

/// Reply-keyboard entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewMessage,
    Faq,
    About,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::NewMessage, MenuItem::Faq, MenuItem::About];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::NewMessage => "📝 New message",
            MenuItem::Faq => "❓ FAQ",
            MenuItem::About => "ℹ️ About",
        }
    }

    /// Matches a button label exactly, as the keyboard sends it.
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.label() == text)
    }
}

/// Inline button actions. Each embeds the question id it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ConfirmQuestion(i64),
    EditQuestion(i64),
    AnswerQuestion(i64),
    SendResponse(i64),
    EditResponse(i64),
}

impl Action {
    const CONFIRM_QUESTION: &'static str = "confirm_question";
    const EDIT_QUESTION: &'static str = "edit_question";
    const ANSWER_QUESTION: &'static str = "answer_user";
    const SEND_RESPONSE: &'static str = "send_response";
    const EDIT_RESPONSE: &'static str = "edit_response";

    pub fn tag(&self) -> &'static str {
        match self {
            Action::ConfirmQuestion(_) => Self::CONFIRM_QUESTION,
            Action::EditQuestion(_) => Self::EDIT_QUESTION,
            Action::AnswerQuestion(_) => Self::ANSWER_QUESTION,
            Action::SendResponse(_) => Self::SEND_RESPONSE,
            Action::EditResponse(_) => Self::EDIT_RESPONSE,
        }
    }

    pub fn question_id(&self) -> i64 {
        match *self {
            Action::ConfirmQuestion(id)
            | Action::EditQuestion(id)
            | Action::AnswerQuestion(id)
            | Action::SendResponse(id)
            | Action::EditResponse(id) => id,
        }
    }

    /// Callback data: `tag:question_id`.
    pub fn callback_data(&self) -> String {
        format!("{}:{}", self.tag(), self.question_id())
    }

    pub fn parse(data: &str) -> Option<Self> {
        let (tag, id) = data.split_once(':')?;
        let id: i64 = id.parse().ok()?;

        match tag {
            Self::CONFIRM_QUESTION => Some(Action::ConfirmQuestion(id)),
            Self::EDIT_QUESTION => Some(Action::EditQuestion(id)),
            Self::ANSWER_QUESTION => Some(Action::AnswerQuestion(id)),
            Self::SEND_RESPONSE => Some(Action::SendResponse(id)),
            Self::EDIT_RESPONSE => Some(Action::EditResponse(id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_callback_data_parses_back() {
        let actions = [
            Action::ConfirmQuestion(1),
            Action::EditQuestion(2),
            Action::AnswerQuestion(3),
            Action::SendResponse(4),
            Action::EditResponse(5),
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.callback_data()), Some(action));
        }
        assert_eq!(Action::AnswerQuestion(17).callback_data(), "answer_user:17");
    }

    #[test]
    fn test_action_parse_rejects_garbage() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("confirm_question"), None);
        assert_eq!(Action::parse("confirm_question:abc"), None);
        assert_eq!(Action::parse("delete_everything:1"), None);
        // Format used by the first version of the bot
        assert_eq!(Action::parse("confirm_question_1"), None);
    }

    #[test]
    fn test_menu_item_from_text() {
        assert_eq!(MenuItem::from_text("📝 New message"), Some(MenuItem::NewMessage));
        assert_eq!(MenuItem::from_text("❓ FAQ"), Some(MenuItem::Faq));
        assert_eq!(MenuItem::from_text("ℹ️ About"), Some(MenuItem::About));
        assert_eq!(MenuItem::from_text("new message"), None);
    }

    #[test]
    fn test_sender_handle() {
        assert_eq!(Sender::new(42).with_username("kate").handle(), "@kate");
        assert_eq!(Sender::new(42).with_name("Kate", None).handle(), "Kate");
        assert_eq!(Sender::new(42).handle(), "42");
        assert_eq!(Sender::new(42).greeting_name(), "there");
    }
}
