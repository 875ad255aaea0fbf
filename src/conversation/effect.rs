use super::event::Action;

/// Parse mode of an outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Telegram MarkdownV2; user content must be escaped.
    MarkdownV2,
    Html,
}

/// An inline button and the action it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button.
    pub label: String,
    /// Sent back as callback data when pressed.
    pub action: Action,
}

impl Button {
    /// Button with `label` that triggers `action`.
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self { label: label.into(), action }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    #[default]
    None,
    /// The persistent reply keyboard with the main menu items.
    MainMenu,
    /// Hides the reply keyboard while the user types.
    Remove,
    /// Opens the reply box in the client.
    ForceReply,
    /// Rows of inline buttons under the message.
    Inline(Vec<Vec<Button>>),
}

/// A message to deliver to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient chat; private chat ids equal user ids.
    pub target: i64,
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Keyboard,
    /// Told to the sender of the triggering event if delivery fails.
    pub on_failure: Option<String>,
}

impl OutboundMessage {
    /// Plain text without a keyboard.
    pub fn new(target: i64, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: Keyboard::None,
            on_failure: None,
        }
    }

    /// Sends the text as MarkdownV2.
    pub fn markdown(mut self) -> Self {
        self.format = TextFormat::MarkdownV2;
        self
    }

    /// Sends the text as HTML.
    pub fn html(mut self) -> Self {
        self.format = TextFormat::Html;
        self
    }

    /// Attaches `keyboard`.
    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Notice for the sender if this message cannot be delivered.
    pub fn on_failure(mut self, notice: impl Into<String>) -> Self {
        self.on_failure = Some(notice.into());
        self
    }
}

/// Outbound side effect produced by a handler.
///
/// Effects are returned only after the store mutation they describe has been
/// committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Delivers a message to its target.
    Send(OutboundMessage),
    /// Short notice answering the pressed inline button.
    Notify(String),
    /// Replaces the text of the message that carried the pressed button.
    EditOrigin(String),
}

impl Effect {
    /// The message if this effect sends one to `target`.
    pub fn sent_to(&self, target: i64) -> Option<&OutboundMessage> {
        match self {
            Effect::Send(message) if message.target == target => Some(message),
            _ => None,
        }
    }
}
