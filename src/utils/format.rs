//! Text helpers for Telegram's MarkdownV2 and HTML parse modes.

/// Escapes every character that has special meaning in MarkdownV2.
///
/// # Example
/// ```
/// use support_bot::utils::format::escape_markdown;
///
/// assert_eq!(escape_markdown("ID (#42)."), "ID \\(\\#42\\)\\.");
/// ```
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes text for the HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shortens `text` to at most `max_chars` characters, appending an ellipsis
/// when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown_specials() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link](url)"), "\\[link\\]\\(url\\)");
        assert_eq!(escape_markdown("a_b-c.d!"), "a\\_b\\-c\\.d\\!");
        assert_eq!(escape_markdown("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_markdown_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("How do I add an achievement?"), "How do I add an achievement?");
        assert_eq!(escape_markdown("Привет, мир"), "Привет, мир");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("abcdef", 3), "abc…");
        assert_eq!(preview("достижение", 4), "дост…");
        assert_eq!(preview("exact", 5), "exact");
    }
}
