use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Support bot commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Write a new message to support")]
    Ask,
    #[command(description = "Cancel the current conversation")]
    Cancel,
    #[command(description = "Show support statistics (administrator only)")]
    Stats,
    #[command(description = "List unanswered questions (administrator only)")]
    Pending,
}
