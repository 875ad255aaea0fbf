//! User-visible texts and the buttons that go with them.

use super::effect::Button;
use super::event::{Action, Sender};
use crate::database::models::Question;
use crate::database::Stats;
use crate::utils::feedback;
use crate::utils::format::{escape_html, escape_markdown, preview};

/// Asks the user to type their question.
pub const PROMPT_QUESTION: &str = "Write your question or message for support:";
/// Follow-up shown with the menu after a question is sent.
pub const ANYTHING_ELSE: &str = "How else can I help?";
/// Reply to input no handler claims.
pub const CHOOSE_ACTION: &str = "Choose an action from the menu:";
/// Usage hint for the administrator's unrecognized input.
pub const ADMIN_HINT: &str =
    "Use the menu, /pending and /stats, or answer questions with the inline buttons.";
/// Replaces the confirmation prompt once the question is forwarded.
pub const QUESTION_SENT: &str =
    "✅ Your question has been sent to support. We will answer you soon!";
/// `/pending` reply when nothing awaits an answer.
pub const NO_PENDING: &str = "🎉 No unanswered questions.";

/// HTML body of the FAQ menu item.
pub const FAQ: &str = "❓ <b>Frequently asked questions</b>

<b>1. How do I sign up?</b>
Press \"Start for free\" on the home page.

<b>2. How do I add an achievement?</b>
In your profile, press \"+ Add achievement\".

<b>3. How do I contact support?</b>
Use the \"📝 New message\" button.

<b>4. Can I delete my profile?</b>
Yes, the option is in your profile settings.

<b>5. Is it free?</b>
Yes, all core features are free.";

/// HTML body of the About menu item.
pub const ABOUT: &str = "<b>About \"My Achievements\"</b>

🎓 <b>Goal:</b> a digital portfolio for students.

📊 <b>Features:</b>
• Adding achievements and awards
• Tracking progress
• Creating classes and groups
• Generating reports";

/// Greeting sent on `/start`.
pub fn welcome(sender: &Sender) -> String {
    format!(
        "Hi, {}! 👋\nI'm the support bot of the \"My Achievements\" project.\nI'll help you get an answer to your question!",
        sender.greeting_name()
    )
}

/// Reply to `/cancel`.
pub fn cancelled() -> String {
    feedback::info("Cancelled. Choose an action from the menu:")
}

/// Reply when a handler fails on a store error.
pub fn generic_error() -> String {
    feedback::error("Something went wrong. Please try again or send /start.")
}

/// Toast for a stale or unknown question button.
pub fn question_not_found() -> String {
    feedback::error("Question not found.")
}

/// Toast for a stale answer button.
pub fn answer_not_found() -> String {
    feedback::error("Answer not found.")
}

/// Rejection for a question that already has its answer.
pub fn already_answered() -> String {
    feedback::warning("This question has already been answered.")
}

/// Rejection for administrator-only commands and buttons.
pub fn admin_only() -> String {
    feedback::error("This command is only available to the administrator.")
}

/// Validation hint; `reason` comes from the validator.
pub fn invalid_text(reason: &str) -> String {
    feedback::warning(&format!("{reason}. Please send your message again."))
}

/// Toast confirming the question was forwarded.
pub fn question_sent_notice() -> String {
    feedback::success("Question sent to support!")
}

/// Shown to the user when the administrator cannot be reached.
pub fn question_delivery_failed() -> String {
    feedback::error("Could not reach support. Please try again later.")
}

/// Toast confirming the answer was delivered.
pub fn answer_sent_notice() -> String {
    feedback::success("Answer sent!")
}

/// Replaces the answer preview once it is sent.
pub fn answer_sent(target_user_id: i64) -> String {
    feedback::success(&format!("Answer sent to user ID: {target_user_id}"))
}

/// Shown to the administrator when the user cannot be reached.
pub fn answer_delivery_failed() -> String {
    feedback::error("Could not deliver the answer. The user may have blocked the bot.")
}

/// MarkdownV2 preview of a staged question.
pub fn confirm_question(question_text: &str) -> String {
    format!(
        "*Your question:*\n{}\n\nSend this question to support?",
        escape_markdown(question_text)
    )
}

/// "Send" and "Edit" buttons under a staged question.
pub fn confirm_question_buttons(question_id: i64) -> Vec<Vec<Button>> {
    vec![vec![
        Button::new("✅ Yes, send", Action::ConfirmQuestion(question_id)),
        Button::new("✏️ Edit", Action::EditQuestion(question_id)),
    ]]
}

/// MarkdownV2 message forwarding a question to the administrator.
pub fn admin_forward(sender: &Sender, question_id: i64, question_text: &str) -> String {
    format!(
        "❓ *New question from a user*\n\n👤 *User:* {} \\(ID: {}\\)\n📝 *Question:*\n{}\n\n🔢 *Question ID:* \\#{}",
        escape_markdown(&sender.handle()),
        sender.id,
        escape_markdown(question_text),
        question_id
    )
}

/// The administrator's "Answer" button for a question.
pub fn answer_buttons(question_id: i64) -> Vec<Vec<Button>> {
    vec![vec![Button::new("📨 Answer", Action::AnswerQuestion(question_id))]]
}

/// Asks the administrator for a reply, quoting the start of the question.
pub fn prompt_response(question_text: &str) -> String {
    format!(
        "💬 Enter your reply to the user (question: \"{}\"):",
        preview(question_text, 50)
    )
}

/// MarkdownV2 preview of a written answer.
pub fn confirm_response(response_text: &str) -> String {
    format!(
        "*Your answer:*\n{}\n\nSend it to the user?",
        escape_markdown(response_text)
    )
}

/// "Send" and "Edit" buttons under a drafted answer.
pub fn confirm_response_buttons(question_id: i64) -> Vec<Vec<Button>> {
    vec![vec![
        Button::new("✅ Yes, send", Action::SendResponse(question_id)),
        Button::new("✏️ Edit", Action::EditResponse(question_id)),
    ]]
}

/// HTML message carrying the administrator's answer to the user.
pub fn user_answer(question_text: &str, response_text: &str) -> String {
    format!(
        "📨 Answer from support:\n\n<i>\"{}\"</i>\n\n{}\n\nIf you still have questions, write to us again.",
        escape_html(question_text),
        escape_html(response_text)
    )
}

/// `/stats` report.
pub fn stats(stats: &Stats) -> String {
    format!(
        "📊 Support statistics\n\n👥 Users: {}\n❓ Questions: {}\n⏳ Pending: {}",
        stats.total_users, stats.total_questions, stats.pending_questions
    )
}

/// One MarkdownV2 entry of the `/pending` listing.
pub fn pending_question(question: &Question) -> String {
    format!(
        "⏳ *Question \\#{}* from user {}\n{}",
        question.id,
        question.user_id,
        escape_markdown(&preview(&question.question_text, 200))
    )
}
